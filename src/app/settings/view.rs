// SPDX-License-Identifier: MPL-2.0

//! Settings drawer view

use crate::app::state::{AppModel, ContextPage, Message};
use crate::config::{AppTheme, PhotoOutputFormat};
use crate::constants::{PhotoQuality, app_info};
use crate::fl;
use cosmic::Element;
use cosmic::app::context_drawer;
use cosmic::iced::{Alignment, Length};
use cosmic::widget;

impl AppModel {
    /// Create the settings view for the context drawer
    pub fn settings_view(&self) -> context_drawer::ContextDrawer<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let camera_selection: Element<'_, Message> = if self.camera_dropdown_options.is_empty() {
            widget::text(fl!("no-cameras")).size(14).into()
        } else {
            widget::dropdown(
                &self.camera_dropdown_options,
                Some(self.current_camera_index),
                Message::SelectCamera,
            )
            .into()
        };

        let theme_dropdown = widget::dropdown(
            &self.theme_dropdown_options,
            AppTheme::ALL
                .iter()
                .position(|t| *t == self.config.app_theme),
            Message::SetAppTheme,
        );

        let format_dropdown = widget::dropdown(
            &self.format_dropdown_options,
            PhotoOutputFormat::ALL
                .iter()
                .position(|f| *f == self.config.photo_format),
            Message::SelectPhotoFormat,
        );

        // JPEG only; PNG is lossless
        let quality_dropdown = widget::dropdown(
            &self.quality_dropdown_options,
            PhotoQuality::ALL
                .iter()
                .position(|q| *q == self.config.photo_quality),
            Message::SelectPhotoQuality,
        );

        let mirror_toggle =
            widget::toggler(self.config.mirror_preview).on_toggle(|_| Message::ToggleMirrorPreview);

        let library_dir = self.config.library_directory();
        let library_row = widget::row()
            .push(
                widget::text(library_dir.display().to_string())
                    .size(12)
                    .width(Length::Fill),
            )
            .push(
                widget::button::standard(fl!("open-folder")).on_press(Message::OpenLibraryFolder),
            )
            .spacing(spacing.space_xs)
            .align_y(Alignment::Center);

        let version_info = if app_info::is_flatpak() {
            fl!("version-flatpak", version = app_info::version())
        } else {
            fl!("version", version = app_info::version())
        };

        let mut settings_column = widget::column()
            .push(section_title(fl!("camera")))
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(camera_selection)
            .push(widget::vertical_space().height(spacing.space_s))
            .push(
                widget::row()
                    .push(section_title(fl!("mirror-preview")))
                    .push(widget::horizontal_space().width(Length::Fill))
                    .push(mirror_toggle)
                    .align_y(Alignment::Center),
            )
            .push(widget::vertical_space().height(spacing.space_l))
            .push(widget::divider::horizontal::default())
            .push(widget::vertical_space().height(spacing.space_s))
            .push(section_title(fl!("photo-format")))
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(format_dropdown);

        if self.config.photo_format == PhotoOutputFormat::Jpeg {
            settings_column = settings_column
                .push(widget::vertical_space().height(spacing.space_s))
                .push(section_title(fl!("photo-quality")))
                .push(widget::vertical_space().height(spacing.space_xxs))
                .push(quality_dropdown);
        }

        let settings_column: Element<'_, Message> = settings_column
            .push(widget::vertical_space().height(spacing.space_s))
            .push(section_title(fl!("save-location")))
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(library_row)
            .push(widget::vertical_space().height(spacing.space_l))
            .push(widget::divider::horizontal::default())
            .push(widget::vertical_space().height(spacing.space_s))
            .push(section_title(fl!("appearance")))
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(theme_dropdown)
            .push(widget::vertical_space().height(spacing.space_l))
            .push(widget::divider::horizontal::default())
            .push(widget::vertical_space().height(spacing.space_s))
            .push(
                widget::row()
                    .push(
                        widget::text(version_info)
                            .size(12)
                            .class(cosmic::theme::Text::Accent),
                    )
                    .push(widget::horizontal_space().width(Length::Fill))
                    .push(
                        widget::button::link(fl!("about"))
                            .on_press(Message::ToggleContextPage(ContextPage::About)),
                    )
                    .align_y(Alignment::Center),
            )
            .spacing(0)
            .into();

        context_drawer::context_drawer(
            settings_column,
            Message::ToggleContextPage(ContextPage::Settings),
        )
        .title(fl!("settings"))
    }
}

fn section_title<'a>(label: String) -> Element<'a, Message> {
    widget::text(label).size(16).font(cosmic::font::bold()).into()
}
