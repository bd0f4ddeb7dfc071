// SPDX-License-Identifier: MPL-2.0

//! Main application module for Shutter
//!
//! # Architecture
//!
//! - `flow`: Idle / Live / Preview state machine (no UI types)
//! - `state`: Application state types (AppModel, Message, ContextPage, DialogPage)
//! - `handlers`: Message handlers grouped by domain
//! - `settings`: Settings drawer UI
//! - `view`: Main view rendering
//! - `update`: Message dispatch

pub mod flow;
mod handlers;
pub mod settings;
mod state;
mod update;
mod view;

use crate::backends::camera::{self, CameraDevice};
use crate::config::{Config, PhotoOutputFormat};
use crate::constants::{PhotoQuality, app_info};
use crate::fl;
use crate::storage::{self, PicturesLibrary};
use cosmic::app::context_drawer;
use cosmic::cosmic_config::CosmicConfigEntry;
use cosmic::iced::Subscription;
use cosmic::widget::{self, about::About};
use cosmic::{Element, Task};
pub use flow::{CaptureFlow, Screen, StartAction};
pub use state::{AppModel, ContextPage, DialogPage, Message};
use std::sync::Arc;
use tracing::{debug, error, info};

const APP_ICON: &[u8] =
    include_bytes!("../../resources/icons/hicolor/scalable/apps/io.github.shutter.Shutter.svg");

impl cosmic::Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    /// Data that your application receives to its init method.
    type Flags = ();

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN (reverse domain name notation) format.
    const APP_ID: &'static str = "io.github.shutter.Shutter";

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    /// Initializes the application with any given flags and startup commands.
    fn init(
        core: cosmic::Core,
        _flags: Self::Flags,
    ) -> (Self, Task<cosmic::Action<Self::Message>>) {
        let about = About::default()
            .name(fl!("app-title"))
            .icon(widget::icon::from_svg_bytes(APP_ICON))
            .version(app_info::version())
            .license(env!("CARGO_PKG_LICENSE"));

        let (config_handler, config) = Config::load(Self::APP_ID);

        let backend = camera::get_backend();
        let store = Arc::new(PicturesLibrary::new(config.library_directory()));
        let capture_dir = storage::capture_cache_directory();

        // Start on the remembered camera; the list is filled in asynchronously
        let initial_device = match config.last_camera_path.as_deref() {
            Some(path) if !path.is_empty() => CameraDevice {
                name: path.to_string(),
                path: path.to_string(),
            },
            _ => CameraDevice::pipewire_default(),
        };

        let app = AppModel {
            core,
            context_page: ContextPage::default(),
            about,
            config,
            config_handler,
            dialog_page: None,
            backend: Arc::clone(&backend),
            store,
            flow: CaptureFlow::new(initial_device),
            capture_dir: capture_dir.clone(),
            available_cameras: Vec::new(),
            current_camera_index: 0,
            viewfinder: None,
            camera_dropdown_options: Vec::new(),
            theme_dropdown_options: vec![
                fl!("theme-system"),
                fl!("theme-dark"),
                fl!("theme-light"),
            ],
            format_dropdown_options: PhotoOutputFormat::ALL
                .iter()
                .map(|f| f.display_name().to_string())
                .collect(),
            quality_dropdown_options: PhotoQuality::ALL
                .iter()
                .map(|q| q.display_name().to_string())
                .collect(),
        };

        let enumerate_task = Task::perform(
            async move {
                tokio::task::spawn_blocking(move || backend.enumerate_cameras())
                    .await
                    .unwrap_or_default()
            },
            |cameras| cosmic::Action::App(Message::CamerasEnumerated(cameras)),
        );

        let clear_cache_task = Task::perform(storage::clear_capture_cache(capture_dir), |n| {
            cosmic::Action::App(Message::CaptureCacheCleared(n))
        });

        info!(version = app_info::version(), "Shutter started");

        (app, Task::batch([enumerate_task, clear_cache_task]))
    }

    /// Elements to pack at the end of the header bar.
    fn header_end(&self) -> Vec<Element<'_, Self::Message>> {
        vec![
            widget::button::icon(widget::icon::from_name("preferences-system-symbolic"))
                .on_press(Message::ToggleContextPage(ContextPage::Settings))
                .into(),
        ]
    }

    /// Display a context drawer if the context page is requested.
    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Self::Message>> {
        if !self.core.window.show_context {
            return None;
        }

        Some(match self.context_page {
            ContextPage::About => context_drawer::about(
                &self.about,
                |url| Message::LaunchUrl(url.to_string()),
                Message::ToggleContextPage(ContextPage::About),
            ),
            ContextPage::Settings => self.settings_view(),
        })
    }

    /// Modal dialog for denied access and failures
    fn dialog(&self) -> Option<Element<'_, Self::Message>> {
        let page = self.dialog_page.as_ref()?;

        let (title, body) = match page {
            DialogPage::AccessDenied => (fl!("access-denied"), fl!("access-denied-body")),
            DialogPage::Error(message) => (fl!("error-title"), message.clone()),
        };

        let dialog = widget::dialog()
            .title(title)
            .body(body)
            .icon(widget::icon::from_name("dialog-warning-symbolic").size(64))
            .primary_action(widget::button::suggested(fl!("ok")).on_press(Message::CloseDialog));

        Some(dialog.into())
    }

    /// Describes the interface based on the current state of the application model.
    fn view(&self) -> Element<'_, Self::Message> {
        self.view()
    }

    /// Register subscriptions for this application.
    fn subscription(&self) -> Subscription<Self::Message> {
        let config_sub = self
            .core()
            .watch_config::<Config>(Self::APP_ID)
            .map(|update| Message::UpdateConfig(update.config));

        match self.viewfinder_subscription() {
            Some(viewfinder_sub) => Subscription::batch([config_sub, viewfinder_sub]),
            None => config_sub,
        }
    }

    /// Handles messages emitted by the application and its widgets.
    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        self.update(message)
    }
}

impl AppModel {
    /// Forward preview frames of the live session
    ///
    /// Keyed on the session generation, so every new session gets a fresh
    /// stream and the old one ends with its sender.
    fn viewfinder_subscription(&self) -> Option<Subscription<Message>> {
        use cosmic::iced::futures::SinkExt;

        let mut receiver = self.flow.session()?.preview();
        let generation = self.flow.session_generation();

        Some(Subscription::run_with_id(
            ("viewfinder", generation),
            cosmic::iced::stream::channel(4, move |mut output| async move {
                debug!(generation, "Viewfinder subscription started");

                while receiver.changed().await.is_ok() {
                    let frame = receiver.borrow_and_update().clone();
                    let Some(frame) = frame else {
                        continue;
                    };
                    if output
                        .send(Message::ViewfinderFrame(generation, frame))
                        .await
                        .is_err()
                    {
                        break;
                    }
                }

                debug!(generation, "Viewfinder subscription ended");
            }),
        ))
    }

    /// Persist the current config, logging failures
    pub(crate) fn save_config(&self, what: &str) {
        if let Some(handler) = self.config_handler.as_ref()
            && let Err(err) = self.config.write_entry(handler)
        {
            error!(?err, setting = what, "Failed to save setting");
        }
    }
}
