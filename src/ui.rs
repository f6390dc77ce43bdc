//! Meter widgets drawn with egui.
//!
//! Drawing is read-only with respect to the meter: user intents come back as
//! [`UiAction`] values and the frame loop applies them to the controller.

use egui::{Align, Color32, Layout, RichText, Sense, Ui};

use crate::classify::SoundType;
use crate::i18n::{Language, Translations};
use crate::meter::MeterState;

const BLUE_500: Color32 = Color32::from_rgb(0x3b, 0x82, 0xf6);
const BLUE_50: Color32 = Color32::from_rgb(0xef, 0xf6, 0xff);
const BLUE_900: Color32 = Color32::from_rgb(0x1e, 0x3a, 0x8a);
const RED_500: Color32 = Color32::from_rgb(0xef, 0x44, 0x44);
const RED_50: Color32 = Color32::from_rgb(0xfe, 0xf2, 0xf2);
const RED_700: Color32 = Color32::from_rgb(0xb9, 0x1c, 0x1c);
const GREEN_500: Color32 = Color32::from_rgb(0x22, 0xc5, 0x5e);
const PURPLE_500: Color32 = Color32::from_rgb(0xa8, 0x55, 0xf7);
const INDIGO_500: Color32 = Color32::from_rgb(0x63, 0x66, 0xf1);
const GRAY_50: Color32 = Color32::from_rgb(0xf9, 0xfa, 0xfb);
const GRAY_600: Color32 = Color32::from_rgb(0x4b, 0x55, 0x63);
const GRAY_800: Color32 = Color32::from_rgb(0x1f, 0x29, 0x37);

/// User intent produced by one UI pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    ToggleRecording,
    SetLanguage(Language),
    Install,
}

/// Which informational panels are open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panels {
    /// Getting-started guide, hidden after the first successful start or "Got it"
    pub show_setup: bool,
    pub show_info: bool,
    pub show_settings: bool,
}

impl Default for Panels {
    fn default() -> Self {
        Self {
            show_setup: true,
            show_info: false,
            show_settings: false,
        }
    }
}

impl Panels {
    /// Apply the outcome of a record toggle: a successful start closes the setup guide
    pub fn record_toggled<T, E>(&mut self, was_recording: bool, outcome: &Result<T, E>) {
        if !was_recording && outcome.is_ok() {
            self.show_setup = false;
        }
    }
}

/// Read-only inputs for one UI pass
pub struct MeterView<'a> {
    pub state: &'a MeterState,
    pub install_available: bool,
}

/// Band energy as the rounded percentage shown next to its bar
pub fn band_percent(energy: f32) -> u32 {
    (energy.max(0.0) * 100.0).round() as u32
}

/// Bar fill for a band energy (raw sums can exceed 1)
pub fn bar_fraction(energy: f32) -> f32 {
    if energy.is_finite() {
        energy.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Draw the whole meter and collect user actions
pub fn draw(ctx: &egui::Context, view: &MeterView<'_>, panels: &mut Panels) -> Vec<UiAction> {
    let mut actions = Vec::new();
    let t = view.state.language.translations();

    egui::CentralPanel::default()
        .frame(egui::Frame::none().inner_margin(24.0))
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                egui::Frame::none()
                    .fill(Color32::WHITE)
                    .rounding(12.0)
                    .inner_margin(24.0)
                    .show(ui, |ui| {
                        header(ui, t, view, panels, &mut actions);
                        ui.add_space(16.0);

                        if panels.show_settings {
                            settings_panel(ui, t, view.state.language, panels, &mut actions);
                        }
                        if view.state.capture_error.is_some() {
                            error_banner(ui, t.error);
                        }
                        if panels.show_setup {
                            setup_guide(ui, t, panels);
                        }
                        if panels.show_info {
                            card(ui, GRAY_50, |ui| {
                                ui.label(RichText::new(t.about.title).strong().color(GRAY_800));
                                ui.label(RichText::new(t.about.description).color(GRAY_600));
                            });
                        }

                        record_button(ui, t, view.state.recording, &mut actions);
                        readings(ui, t, view.state);

                        if view.state.recording {
                            recording_indicator(ui, t.recording);
                        }
                    });
            });
        });

    actions
}

fn header(
    ui: &mut Ui,
    t: &Translations,
    view: &MeterView<'_>,
    panels: &mut Panels,
    actions: &mut Vec<UiAction>,
) {
    ui.horizontal(|ui| {
        ui.heading(RichText::new(t.title).size(28.0).strong().color(GRAY_800));
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            if view.install_available {
                let install = egui::Button::new(RichText::new(t.install).color(Color32::WHITE))
                    .fill(INDIGO_500);
                if ui.add(install).clicked() {
                    actions.push(UiAction::Install);
                }
            }
            if ui.button("?").on_hover_text(t.about.title).clicked() {
                panels.show_info = !panels.show_info;
            }
            if ui.button("⚙").on_hover_text(t.settings).clicked() {
                panels.show_settings = !panels.show_settings;
            }
        });
    });
}

fn settings_panel(
    ui: &mut Ui,
    t: &Translations,
    current: Language,
    panels: &mut Panels,
    actions: &mut Vec<UiAction>,
) {
    card(ui, GRAY_50, |ui| {
        ui.horizontal(|ui| {
            ui.label(RichText::new(t.settings).strong().color(GRAY_800));
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if ui.button("×").clicked() {
                    panels.show_settings = false;
                }
            });
        });
        ui.label(t.language);
        ui.horizontal(|ui| {
            for language in Language::ALL {
                if ui
                    .selectable_label(language == current, language.native_name())
                    .clicked()
                    && language != current
                {
                    actions.push(UiAction::SetLanguage(language));
                }
            }
        });
    });
}

fn error_banner(ui: &mut Ui, message: &str) {
    card(ui, RED_50, |ui| {
        ui.horizontal(|ui| {
            ui.label(RichText::new("⚠").color(RED_700));
            ui.label(RichText::new(message).color(RED_700));
        });
    });
}

fn setup_guide(ui: &mut Ui, t: &Translations, panels: &mut Panels) {
    card(ui, BLUE_50, |ui| {
        ui.label(RichText::new(t.setup.title).size(18.0).strong().color(BLUE_900));
        ui.label(RichText::new(t.setup.description).color(BLUE_900));
        ui.add_space(8.0);
        for (n, step) in [t.setup.step1, t.setup.step2, t.setup.step3]
            .into_iter()
            .enumerate()
        {
            ui.label(RichText::new(format!("{}. {}", n + 1, step)).color(BLUE_900));
        }
        ui.add_space(8.0);
        let understand = egui::Button::new(RichText::new(t.setup.understand).color(Color32::WHITE))
            .fill(BLUE_500);
        if ui.add(understand).clicked() {
            panels.show_setup = false;
        }
    });
}

fn record_button(ui: &mut Ui, t: &Translations, recording: bool, actions: &mut Vec<UiAction>) {
    ui.add_space(8.0);
    ui.vertical_centered(|ui| {
        let (text, fill) = if recording {
            (t.stop, RED_500)
        } else {
            (t.start, BLUE_500)
        };
        let button = egui::Button::new(RichText::new(text).size(18.0).color(Color32::WHITE))
            .fill(fill)
            .rounding(24.0)
            .min_size(egui::vec2(180.0, 48.0));
        if ui.add(button).clicked() {
            actions.push(UiAction::ToggleRecording);
        }
    });
    ui.add_space(16.0);
}

fn readings(ui: &mut Ui, t: &Translations, state: &MeterState) {
    ui.columns(2, |cols| {
        card(&mut cols[0], GRAY_50, |ui| {
            ui.label(RichText::new(t.volume).size(16.0).color(GRAY_800));
            ui.add(egui::ProgressBar::new(state.volume as f32 / 100.0).fill(GREEN_500));
            ui.with_layout(Layout::right_to_left(Align::Min), |ui| {
                ui.label(format!("{}%", state.volume));
            });
        });

        card(&mut cols[1], GRAY_50, |ui| {
            ui.label(RichText::new(t.frequency).size(16.0).color(GRAY_800));
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new(format!("{} Hz", state.frequency_hz))
                        .size(28.0)
                        .strong()
                        .color(GRAY_800),
                );
                let sound_type: SoundType = state.sound_type();
                ui.label(RichText::new(sound_type.label(t)).color(GRAY_600));
            });
        });

        card(&mut cols[0], GRAY_50, |ui| {
            ui.label(RichText::new(t.ranges.title).size(16.0).color(GRAY_800));
            band_bar(ui, t.ranges.low, state.bands.low, BLUE_500);
            band_bar(ui, t.ranges.mid, state.bands.mid, GREEN_500);
            band_bar(ui, t.ranges.high, state.bands.high, PURPLE_500);
        });

        card(&mut cols[1], GRAY_50, |ui| {
            ui.label(RichText::new(t.analysis.title).size(16.0).color(GRAY_800));
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new(state.source.label(t))
                        .size(22.0)
                        .strong()
                        .color(GRAY_800),
                );
            });
        });
    });
}

fn band_bar(ui: &mut Ui, label: &str, energy: f32, color: Color32) {
    ui.horizontal(|ui| {
        ui.label(RichText::new(label).color(GRAY_600));
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            ui.label(format!("{}%", band_percent(energy)));
        });
    });
    ui.add(egui::ProgressBar::new(bar_fraction(energy)).fill(color));
}

fn recording_indicator(ui: &mut Ui, text: &str) {
    ui.add_space(16.0);
    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(egui::vec2(8.0, 8.0), Sense::hover());
        ui.painter().circle_filled(rect.center(), 4.0, RED_500);
        ui.label(RichText::new(text).color(GRAY_600));
    });
}

fn card(ui: &mut Ui, fill: Color32, add_contents: impl FnOnce(&mut Ui)) {
    egui::Frame::none()
        .fill(fill)
        .rounding(8.0)
        .inner_margin(16.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            add_contents(ui);
        });
    ui.add_space(12.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::BandEnergies;
    use crate::classify::SoundSource;
    use crate::error::MeterError;
    use egui::epaint::ClippedShape;
    use egui::{Event, Modifiers, PointerButton, Pos2, RawInput, Rect, Shape};

    fn run(state: &MeterState, panels: &mut Panels, install_available: bool) -> Vec<UiAction> {
        let ctx = egui::Context::default();
        let view = MeterView {
            state,
            install_available,
        };
        let mut actions = Vec::new();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            actions = draw(ctx, &view, panels);
        });
        actions
    }

    /// Persistent egui context so widget rects carry over between frames
    struct Screen {
        ctx: egui::Context,
        panels: Panels,
    }

    impl Screen {
        fn new(panels: Panels) -> Self {
            Self {
                ctx: egui::Context::default(),
                panels,
            }
        }

        fn frame(
            &mut self,
            state: &MeterState,
            install_available: bool,
            events: Vec<Event>,
        ) -> (Vec<UiAction>, Vec<ClippedShape>) {
            let view = MeterView {
                state,
                install_available,
            };
            let input = RawInput {
                screen_rect: Some(Rect::from_min_size(Pos2::ZERO, egui::vec2(800.0, 2000.0))),
                events,
                ..Default::default()
            };
            let panels = &mut self.panels;
            let mut actions = Vec::new();
            let output = self.ctx.run(input, |ctx| {
                actions = draw(ctx, &view, panels);
            });
            (actions, output.shapes)
        }

        /// Lay out one frame, then press and release on the widget showing `text`
        fn click(
            &mut self,
            state: &MeterState,
            install_available: bool,
            text: &str,
        ) -> Vec<UiAction> {
            let (_, shapes) = self.frame(state, install_available, Vec::new());
            let pos = find_text(&shapes, text)
                .unwrap_or_else(|| panic!("no widget labelled {:?}", text))
                .center();

            let press = vec![
                Event::PointerMoved(pos),
                Event::PointerButton {
                    pos,
                    button: PointerButton::Primary,
                    pressed: true,
                    modifiers: Modifiers::default(),
                },
            ];
            let release = vec![Event::PointerButton {
                pos,
                button: PointerButton::Primary,
                pressed: false,
                modifiers: Modifiers::default(),
            }];

            let (mut actions, _) = self.frame(state, install_available, press);
            actions.extend(self.frame(state, install_available, release).0);
            actions
        }
    }

    fn find_text(shapes: &[ClippedShape], text: &str) -> Option<Rect> {
        fn search(shape: &Shape, text: &str) -> Option<Rect> {
            match shape {
                Shape::Text(t) if t.galley.text() == text => Some(shape.visual_bounding_rect()),
                Shape::Vec(children) => children.iter().find_map(|s| search(s, text)),
                _ => None,
            }
        }
        shapes.iter().find_map(|clipped| search(&clipped.shape, text))
    }

    fn english_idle() -> MeterState {
        MeterState {
            language: Language::En,
            ..Default::default()
        }
    }

    #[test]
    fn test_band_percent() {
        assert_eq!(band_percent(0.0), 0);
        assert_eq!(band_percent(0.456), 46);
        assert_eq!(band_percent(3.2), 320);
    }

    #[test]
    fn test_bar_fraction_clamps() {
        assert_eq!(bar_fraction(0.25), 0.25);
        assert_eq!(bar_fraction(7.0), 1.0);
        assert_eq!(bar_fraction(-1.0), 0.0);
        assert_eq!(bar_fraction(f32::NAN), 0.0);
    }

    #[test]
    fn test_panels_default_to_setup_guide() {
        let panels = Panels::default();
        assert!(panels.show_setup);
        assert!(!panels.show_info);
        assert!(!panels.show_settings);
    }

    #[test]
    fn test_draw_without_input_produces_no_actions() {
        let state = MeterState {
            recording: true,
            volume: 42,
            frequency_hz: 3000,
            bands: BandEnergies {
                low: 0.2,
                mid: 1.7,
                high: 12.0,
            },
            source: SoundSource::Bird,
            capture_error: Some("denied".to_string()),
            language: Language::En,
        };
        let mut panels = Panels {
            show_setup: true,
            show_info: true,
            show_settings: true,
        };

        let actions = run(&state, &mut panels, true);
        assert!(actions.is_empty());
        assert_eq!(
            panels,
            Panels {
                show_setup: true,
                show_info: true,
                show_settings: true,
            }
        );
    }

    #[test]
    fn test_record_button_requests_toggle() {
        let t = Language::En.translations();
        let mut screen = Screen::new(Panels::default());
        let actions = screen.click(&english_idle(), false, t.start);
        assert_eq!(actions, vec![UiAction::ToggleRecording]);

        let recording = MeterState {
            recording: true,
            ..english_idle()
        };
        let actions = screen.click(&recording, false, t.stop);
        assert_eq!(actions, vec![UiAction::ToggleRecording]);
    }

    #[test]
    fn test_language_selector_requests_switch() {
        let mut screen = Screen::new(Panels {
            show_settings: true,
            ..Default::default()
        });
        let state = MeterState::default();
        assert_eq!(state.language, Language::Ru);

        let actions = screen.click(&state, false, Language::En.native_name());
        assert_eq!(actions, vec![UiAction::SetLanguage(Language::En)]);

        // Selecting the active language is not a change
        let actions = screen.click(&state, false, Language::Ru.native_name());
        assert!(actions.is_empty());
    }

    #[test]
    fn test_got_it_closes_setup_guide() {
        let t = Language::En.translations();
        let mut screen = Screen::new(Panels::default());
        let actions = screen.click(&english_idle(), false, t.setup.understand);
        assert!(actions.is_empty());
        assert!(!screen.panels.show_setup);

        let (_, shapes) = screen.frame(&english_idle(), false, Vec::new());
        assert!(find_text(&shapes, t.setup.understand).is_none());
    }

    #[test]
    fn test_install_button_only_when_offered() {
        let t = Language::En.translations();
        let mut screen = Screen::new(Panels::default());

        let (_, shapes) = screen.frame(&english_idle(), false, Vec::new());
        assert!(find_text(&shapes, t.install).is_none());

        let actions = screen.click(&english_idle(), true, t.install);
        assert_eq!(actions, vec![UiAction::Install]);
    }

    #[test]
    fn test_successful_start_closes_setup_guide() {
        let mut panels = Panels::default();
        panels.record_toggled(false, &Ok::<(), MeterError>(()));
        assert!(!panels.show_setup);
    }

    #[test]
    fn test_denied_start_keeps_setup_guide() {
        let mut panels = Panels::default();
        panels.record_toggled(false, &Err::<(), _>(MeterError::capture("denied")));
        assert!(panels.show_setup);
    }

    #[test]
    fn test_stop_leaves_setup_guide_alone() {
        let mut panels = Panels::default();
        panels.record_toggled(true, &Ok::<(), MeterError>(()));
        assert!(panels.show_setup);
    }

    #[test]
    fn test_draw_idle_meter() {
        let state = MeterState::default();
        let mut panels = Panels::default();
        assert!(run(&state, &mut panels, false).is_empty());
    }
}
