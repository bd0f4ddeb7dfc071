// SPDX-License-Identifier: GPL-3.0-only

//! Main application view
//!
//! One of three screens, picked by the capture flow:
//! - Idle: "Take Picture"
//! - Live: viewfinder with the shutter button
//! - Preview: captured photo with "Re-take" and "Save photo"

use crate::app::flow::Screen;
use crate::app::state::{AppModel, Message};
use crate::constants::ui;
use crate::fl;
use cosmic::Element;
use cosmic::iced::{Alignment, Background, Border, Color, ContentFit, Length};
use cosmic::widget;

impl AppModel {
    /// Build the main application view
    pub fn view(&self) -> Element<'_, Message> {
        let content = match self.flow.screen() {
            Screen::Idle => self.build_idle_screen(),
            Screen::Live => self.build_live_screen(),
            Screen::Preview => self.build_preview_screen(),
        };

        let background = match self.flow.screen() {
            Screen::Idle => None,
            Screen::Live | Screen::Preview => Some(Background::Color(Color::BLACK)),
        };

        widget::container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(move |_theme| widget::container::Style {
                background,
                ..Default::default()
            })
            .into()
    }

    fn build_idle_screen(&self) -> Element<'_, Message> {
        let [r, g, b] = ui::START_BUTTON_COLOR;
        let take_picture = action_button(
            fl!("take-picture"),
            Color::from_rgb(r, g, b),
            (!self.flow.is_permission_pending()).then_some(Message::TakePicture),
        );

        widget::container(take_picture)
            .center(Length::Fill)
            .into()
    }

    fn build_live_screen(&self) -> Element<'_, Message> {
        let viewfinder: Element<'_, Message> = match &self.viewfinder {
            Some(handle) => widget::image::Image::new(handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => widget::container(widget::text(fl!("starting-camera")))
                .center(Length::Fill)
                .style(|_theme| widget::container::Style {
                    text_color: Some(Color::WHITE),
                    ..Default::default()
                })
                .into(),
        };

        let controls = widget::column()
            .push(widget::vertical_space())
            .push(self.build_capture_button())
            .push(widget::Space::new(
                Length::Fill,
                Length::Fixed(ui::CAPTURE_BUTTON_BOTTOM_MARGIN),
            ))
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(Alignment::Center);

        cosmic::iced::widget::stack![viewfinder, controls]
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Round shutter button; gray and inactive while a capture is running
    fn build_capture_button(&self) -> Element<'_, Message> {
        let capturing = self.flow.is_capturing();
        let size = if capturing {
            ui::CAPTURE_BUTTON_SIZE * 0.85
        } else {
            ui::CAPTURE_BUTTON_SIZE
        };
        let color = if capturing {
            Color::from_rgb(0.7, 0.7, 0.7)
        } else {
            Color::WHITE
        };

        let inner = widget::container(widget::Space::new(
            Length::Fixed(size),
            Length::Fixed(size),
        ))
        .style(move |_theme| widget::container::Style {
            background: Some(Background::Color(color)),
            border: Border {
                radius: (size / 2.0).into(),
                width: 3.0,
                color: Color::from_rgba(0.0, 0.0, 0.0, 0.4),
            },
            ..Default::default()
        });

        let button = widget::button::custom(inner)
            .padding(0)
            .on_press_maybe((!capturing).then_some(Message::Capture));

        // Fixed-size wrapper so the shrink does not shift the layout
        widget::container(button)
            .width(Length::Fixed(ui::CAPTURE_BUTTON_SIZE))
            .height(Length::Fixed(ui::CAPTURE_BUTTON_SIZE))
            .center(Length::Fixed(ui::CAPTURE_BUTTON_SIZE))
            .into()
    }

    fn build_preview_screen(&self) -> Element<'_, Message> {
        let Some(photo) = self.flow.photo() else {
            return widget::Space::new(Length::Fill, Length::Fill).into();
        };

        let image = widget::image::Image::new(widget::image::Handle::from_path(
            photo.reference.path(),
        ))
        .content_fit(ContentFit::Contain)
        .width(Length::Fill)
        .height(Length::Fill);

        let saving = self.flow.is_saving();
        let button_color = Color::from_rgba(0.0, 0.0, 0.0, 0.6);

        let retake = action_button(
            fl!("retake"),
            button_color,
            (!saving).then_some(Message::Retake),
        );
        let save_label = if saving {
            fl!("saving")
        } else {
            fl!("save-photo")
        };
        let save = action_button(save_label, button_color, (!saving).then_some(Message::SavePhoto));

        let buttons = widget::row()
            .push(retake)
            .push(widget::horizontal_space())
            .push(save)
            .padding(ui::PREVIEW_PADDING)
            .align_y(Alignment::Center);

        widget::column()
            .push(image)
            .push(buttons)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

/// Text button with a solid background, disabled when `on_press` is `None`
fn action_button<'a>(
    label: String,
    background: Color,
    on_press: Option<Message>,
) -> Element<'a, Message> {
    let enabled = on_press.is_some();
    let text_color = if enabled {
        Color::WHITE
    } else {
        Color::from_rgba(1.0, 1.0, 1.0, 0.5)
    };

    let content = widget::container(widget::text(label).size(ui::PREVIEW_BUTTON_TEXT_SIZE))
        .center(Length::Fill)
        .style(move |_theme| widget::container::Style {
            background: Some(Background::Color(background)),
            text_color: Some(text_color),
            border: Border {
                radius: ui::ACTION_BUTTON_RADIUS.into(),
                ..Default::default()
            },
            ..Default::default()
        });

    widget::button::custom(content)
        .padding(0)
        .width(Length::Fixed(ui::ACTION_BUTTON_WIDTH))
        .height(Length::Fixed(ui::ACTION_BUTTON_HEIGHT))
        .on_press_maybe(on_press)
        .into()
}
