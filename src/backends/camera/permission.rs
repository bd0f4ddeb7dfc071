// SPDX-License-Identifier: GPL-3.0-only

//! Camera access permission
//!
//! Asks the XDG desktop portal (`org.freedesktop.portal.Camera`), which shows
//! the permission prompt inside sandboxes and grants host applications
//! directly. When no portal answers on the session bus we fall back to
//! checking whether the V4L2 nodes can be opened.

use super::types::Permission;
use super::v4l2_utils;
use crate::constants::timing;
use ashpd::desktop::camera::Camera;
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

/// Request camera access, resolving to the user's answer
pub async fn request_camera_access() -> Permission {
    ask_portal(
        portal_access_camera(),
        Duration::from_secs(timing::PERMISSION_TIMEOUT_SECS),
    )
    .await
}

/// Await a portal request, giving up after `timeout`
///
/// An unanswered prompt counts as a denial so the user can ask again.
async fn ask_portal<F>(request: F, timeout: Duration) -> Permission
where
    F: Future<Output = Result<(), ashpd::Error>>,
{
    let Ok(result) = tokio::time::timeout(timeout, request).await else {
        warn!(timeout_secs = timeout.as_secs(), "Camera portal did not answer");
        return Permission::Denied;
    };

    match permission_from_portal(&result) {
        Some(permission) => {
            info!(?permission, "Camera portal answered");
            permission
        }
        None => {
            if let Err(e) = &result {
                warn!(error = %e, "Camera portal unavailable, checking device access");
            }
            let nodes = v4l2_utils::list_video_nodes();
            let accessible: Vec<bool> = nodes
                .iter()
                .map(|node| v4l2_utils::is_accessible(node))
                .collect();
            permission_from_device_access(&accessible)
        }
    }
}

/// Map a portal result to a decision, `None` when the portal itself failed
pub fn permission_from_portal(result: &Result<(), ashpd::Error>) -> Option<Permission> {
    match result {
        Ok(()) => Some(Permission::Granted),
        // Cancelled by the user or refused by the portal
        Err(ashpd::Error::Response(_)) => Some(Permission::Denied),
        Err(_) => None,
    }
}

/// Fallback decision from per-node access results
///
/// With no V4L2 nodes at all the camera (if any) is only reachable through
/// PipeWire, which does its own access control, so we grant.
pub fn permission_from_device_access(accessible: &[bool]) -> Permission {
    if accessible.is_empty() || accessible.iter().any(|ok| *ok) {
        Permission::Granted
    } else {
        Permission::Denied
    }
}

async fn portal_access_camera() -> Result<(), ashpd::Error> {
    let camera = Camera::new().await?;
    camera.request_access().await?.response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ashpd::desktop::ResponseError;

    #[test]
    fn test_portal_answers() {
        assert_eq!(permission_from_portal(&Ok(())), Some(Permission::Granted));
        assert_eq!(
            permission_from_portal(&Err(ashpd::Error::Response(ResponseError::Cancelled))),
            Some(Permission::Denied)
        );
        assert_eq!(
            permission_from_portal(&Err(ashpd::Error::Response(ResponseError::Other))),
            Some(Permission::Denied)
        );
    }

    #[test]
    fn test_device_access_fallback() {
        assert_eq!(permission_from_device_access(&[]), Permission::Granted);
        assert_eq!(permission_from_device_access(&[false, true]), Permission::Granted);
        assert_eq!(permission_from_device_access(&[false, false]), Permission::Denied);
    }

    #[tokio::test]
    async fn test_unanswered_prompt_is_denied() {
        let never = futures::future::pending::<Result<(), ashpd::Error>>();

        let permission = ask_portal(never, Duration::from_millis(20)).await;

        assert_eq!(permission, Permission::Denied);
    }

    #[tokio::test]
    async fn test_granted_prompt() {
        let granted = async { Ok(()) };

        let permission = ask_portal(granted, Duration::from_secs(1)).await;

        assert_eq!(permission, Permission::Granted);
    }
}
