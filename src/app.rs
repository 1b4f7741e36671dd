use crate::{
    controller::{ControlAction, DisplayState, RefreshLoop},
    runner::CommandRunner,
    theme::Palette,
};
use eframe::egui::{self, Margin, RichText, Stroke};
use std::time::Instant;
use tracing::info;

pub const WINDOW_TITLE: &str = "🎧 Media Control";
pub const WINDOW_SIZE: [f32; 2] = [400.0, 650.0];

const PLAYER_HEADING: &str = "🎶 Active player:";
const RESET_GLYPH: &str = "🔄";
const FOOTER: &str =
    "Works with Spotify, Firefox, Chrome, etc.\nGlobal media and system volume control.";
const BUTTON_HEIGHT: f32 = 34.0;
const RESET_BUTTON_WIDTH: f32 = 36.0;

/// Something the user did during one frame, applied after drawing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PanelEvent {
    Select(usize),
    ResetSelection,
    Action(ControlAction),
}

pub struct App<R> {
    refresh: RefreshLoop<R>,
    palette: Palette,
}

impl<R: CommandRunner> App<R> {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        refresh: RefreshLoop<R>,
        palette: Palette,
    ) -> Self {
        palette.apply(&cc.egui_ctx);
        Self { refresh, palette }
    }

    fn handle_event(&mut self, event: PanelEvent) {
        let controller = self.refresh.controller_mut();
        match event {
            PanelEvent::Select(index) => {
                controller.select_player(index);
            }
            PanelEvent::ResetSelection => controller.refresh(true),
            PanelEvent::Action(action) => controller.perform(action),
        }
    }
}

impl<R: CommandRunner> eframe::App for App<R> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.viewport().close_requested()) && !self.refresh.is_shut_down() {
            info!("window closing");
            self.refresh.shutdown();
        }

        if let Some(wait) = self.refresh.pump(Instant::now()) {
            ctx.request_repaint_after(wait);
        }

        let mut events = Vec::new();
        let panel_frame = egui::Frame::new()
            .fill(self.palette.background)
            .inner_margin(Margin::same(20));

        egui::CentralPanel::default()
            .frame(panel_frame)
            .show(ctx, |ui| {
                ui.spacing_mut().item_spacing.y = 8.0;
                render_panel(ui, self.refresh.controller().display(), &self.palette, &mut events);
            });

        if !events.is_empty() {
            for event in events {
                self.handle_event(event);
            }
            ctx.request_repaint();
        }
    }
}

impl<R> Drop for App<R> {
    fn drop(&mut self) {
        self.refresh.shutdown();
    }
}

fn render_panel(
    ui: &mut egui::Ui,
    display: &DisplayState,
    palette: &Palette,
    events: &mut Vec<PanelEvent>,
) {
    ui.label(RichText::new(PLAYER_HEADING).strong().color(palette.foreground));
    render_player_picker(ui, display, events);
    ui.add_space(4.0);
    render_info_box(ui, display, palette);
    ui.add_space(4.0);

    for action in ControlAction::ALL {
        let button = egui::Button::new(RichText::new(action.label()).color(palette.foreground))
            .fill(palette.accent)
            .stroke(Stroke::NONE);
        if ui
            .add_sized([ui.available_width(), BUTTON_HEIGHT], button)
            .clicked()
        {
            events.push(PanelEvent::Action(action));
        }
    }

    ui.add_space(12.0);
    ui.vertical_centered(|ui| {
        ui.label(RichText::new(FOOTER).size(11.0).color(palette.footer_text));
    });
}

fn render_player_picker(ui: &mut egui::Ui, display: &DisplayState, events: &mut Vec<PanelEvent>) {
    ui.horizontal(|ui| {
        let width = (ui.available_width() - RESET_BUTTON_WIDTH - ui.spacing().item_spacing.x)
            .max(120.0);
        egui::ComboBox::from_id_salt("player_select")
            .selected_text(display.player_text.as_str())
            .width(width)
            .show_ui(ui, |ui| {
                for (index, label) in display.player_labels.iter().enumerate() {
                    let selected = display.selected_index == Some(index);
                    if ui.selectable_label(selected, label.as_str()).clicked() && !selected {
                        events.push(PanelEvent::Select(index));
                    }
                }
            });

        let reset_size = [RESET_BUTTON_WIDTH, ui.spacing().interact_size.y];
        if ui
            .add_sized(reset_size, egui::Button::new(RESET_GLYPH))
            .on_hover_text("Refresh players and select the first one")
            .clicked()
        {
            events.push(PanelEvent::ResetSelection);
        }
    });
}

fn render_info_box(ui: &mut egui::Ui, display: &DisplayState, palette: &Palette) {
    egui::Frame::new()
        .fill(palette.box_fill)
        .stroke(Stroke::new(1.0, palette.footer_text))
        .inner_margin(Margin::symmetric(12, 10))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.add(
                    egui::Label::new(
                        RichText::new(display.title.as_str())
                            .strong()
                            .size(15.0)
                            .color(palette.foreground),
                    )
                    .wrap(),
                );
                ui.label(RichText::new(display.status.as_str()).color(palette.status_text));
                ui.label(RichText::new(display.volume.as_str()).color(palette.volume_text));
            });
        });
}
