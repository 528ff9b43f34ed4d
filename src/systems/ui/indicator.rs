use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::config::INDICATOR_DURATION;
use crate::systems::city::{GenerationCompleteEvent, GenerationSummary};

#[derive(Resource)]
pub struct GenerationIndicator {
    pub summary: Option<GenerationSummary>,
    pub timer: f32,
    pub duration: f32,
}

impl Default for GenerationIndicator {
    fn default() -> Self {
        Self {
            summary: None,
            timer: 0.0,
            duration: INDICATOR_DURATION,
        }
    }
}

impl GenerationIndicator {
    pub fn trigger(&mut self, summary: GenerationSummary) {
        self.summary = Some(summary);
        self.timer = self.duration;
    }

    pub fn tick(&mut self, delta: f32) {
        if self.timer > 0.0 {
            self.timer = (self.timer - delta).max(0.0);
        }
    }

    pub fn alpha(&self) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        (self.timer / self.duration).clamp(0.0, 1.0)
    }
}

pub fn update_generation_indicator(
    mut indicator: ResMut<GenerationIndicator>,
    mut events: EventReader<GenerationCompleteEvent>,
    time: Res<Time>,
) {
    for event in events.read() {
        indicator.trigger(event.0);
    }

    indicator.tick(time.delta_secs());
}

// fading banner shown after every generation pass
pub fn render_generation_indicator(
    indicator: Res<GenerationIndicator>,
    mut contexts: EguiContexts,
) {
    if indicator.timer <= 0.0 {
        return;
    }

    let Some(summary) = indicator.summary else {
        return;
    };

    if let Ok(ctx) = contexts.ctx_mut() {
        let alpha = indicator.alpha();
        let bg_color = egui::Color32::from_rgb(45, 72, 116);

        egui::Area::new(egui::Id::new("generation_indicator"))
            .anchor(egui::Align2::CENTER_TOP, egui::vec2(0.0, 60.0))
            .show(ctx, |ui| {
                let frame = egui::Frame::new()
                    .fill(egui::Color32::from_rgba_unmultiplied(
                        bg_color.r(), bg_color.g(), bg_color.b(),
                        (200.0 * alpha) as u8
                    ))
                    .stroke(egui::Stroke::new(
                        1.5,
                        egui::Color32::from_rgba_unmultiplied(255, 255, 255, (180.0 * alpha) as u8)
                    ))
                    .inner_margin(egui::Margin::symmetric(16, 8))
                    .corner_radius(egui::CornerRadius::same(6));

                frame.show(ui, |ui| {
                    let text_color = egui::Color32::from_rgba_unmultiplied(255, 255, 255, (255.0 * alpha) as u8);
                    ui.label(egui::RichText::new("CITY GENERATED")
                        .size(16.0)
                        .color(text_color)
                        .strong());
                    ui.label(egui::RichText::new(format!(
                        "{} buildings in {:.1} ms",
                        summary.stats.buildings, summary.elapsed_ms
                    ))
                        .size(12.0)
                        .color(text_color));
                });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::city::layout::GenerationStats;

    fn summary() -> GenerationSummary {
        GenerationSummary {
            seed: 1,
            stats: GenerationStats::default(),
            elapsed_ms: 4.0,
        }
    }

    #[test]
    fn indicator_fades_out() {
        let mut indicator = GenerationIndicator::default();
        assert_eq!(indicator.alpha(), 0.0);

        indicator.trigger(summary());
        assert_eq!(indicator.alpha(), 1.0);

        indicator.tick(indicator.duration / 2.0);
        assert!((indicator.alpha() - 0.5).abs() < 1e-6);

        indicator.tick(indicator.duration);
        assert_eq!(indicator.timer, 0.0);
        assert_eq!(indicator.alpha(), 0.0);
    }

    #[test]
    fn retrigger_restarts_timer() {
        let mut indicator = GenerationIndicator::default();
        indicator.trigger(summary());
        indicator.tick(1.5);
        indicator.trigger(GenerationSummary { seed: 2, ..summary() });

        assert_eq!(indicator.timer, indicator.duration);
        assert_eq!(indicator.summary.map(|s| s.seed), Some(2));
    }
}
