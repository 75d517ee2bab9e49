// src/services/gantt.rs
//
// Geometria do Gantt: escala em px/hora, scroll horizontal e zoom ancorado no cursor.

use chrono::NaiveDateTime;

pub const MIN_PX_PER_HOUR: f64 = 4.0;
pub const MAX_PX_PER_HOUR: f64 = 480.0;
pub const DEFAULT_PX_PER_HOUR: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub px_per_hour: f64,
    pub scroll_left: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            px_per_hour: DEFAULT_PX_PER_HOUR,
            scroll_left: 0.0,
        }
    }
}

impl Viewport {
    pub fn new(px_per_hour: f64, scroll_left: f64) -> Self {
        Self {
            px_per_hour: clamp_scale(px_per_hour),
            scroll_left: non_negative(scroll_left),
        }
    }

    /// Hora (a partir da origem) que está sob a posição `x` da tela.
    pub fn hours_at(&self, x: f64) -> f64 {
        (self.scroll_left + x) / self.px_per_hour
    }

    /// Multiplica a escala por `factor` mantendo fixa a hora sob `cursor_x`.
    /// Quando a escala bate no limite, o ponto sob o cursor continua fixo
    /// desde que o scroll não precise ficar negativo.
    pub fn zoom_at(&self, factor: f64, cursor_x: f64) -> Self {
        if !factor.is_finite() || factor <= 0.0 {
            return *self;
        }
        let cursor_x = non_negative(cursor_x);
        let anchor = self.hours_at(cursor_x);
        let px_per_hour = clamp_scale(self.px_per_hour * factor);

        Self {
            px_per_hour,
            scroll_left: non_negative(anchor * px_per_hour - cursor_x),
        }
    }

    /// `(left, width)` em pixels para uma barra que começa `start_hours`
    /// depois da origem e dura `duration_hours`.
    pub fn bar_geometry(&self, start_hours: f64, duration_hours: f64) -> (f64, f64) {
        (
            start_hours * self.px_per_hour - self.scroll_left,
            duration_hours * self.px_per_hour,
        )
    }
}

pub fn hours_between(origin: NaiveDateTime, at: NaiveDateTime) -> f64 {
    (at - origin).num_seconds() as f64 / 3600.0
}

fn clamp_scale(px_per_hour: f64) -> f64 {
    if px_per_hour.is_finite() {
        px_per_hour.clamp(MIN_PX_PER_HOUR, MAX_PX_PER_HOUR)
    } else {
        DEFAULT_PX_PER_HOUR
    }
}

fn non_negative(px: f64) -> f64 {
    if px.is_finite() { px.max(0.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn scale_is_clamped() {
        assert_eq!(Viewport::new(1.0, 0.0).px_per_hour, MIN_PX_PER_HOUR);
        assert_eq!(Viewport::new(10_000.0, 0.0).px_per_hour, MAX_PX_PER_HOUR);
        assert_eq!(Viewport::new(f64::NAN, -5.0), Viewport::default());
    }

    #[test]
    fn zoom_keeps_the_hour_under_the_cursor() {
        let view = Viewport::new(40.0, 200.0);
        let before = view.hours_at(300.0);

        let zoomed = view.zoom_at(2.0, 300.0);
        assert_eq!(zoomed.px_per_hour, 80.0);
        assert!(close(zoomed.hours_at(300.0), before));

        let back = zoomed.zoom_at(0.5, 300.0);
        assert!(close(back.px_per_hour, 40.0));
        assert!(close(back.scroll_left, 200.0));
    }

    #[test]
    fn zoom_out_never_scrolls_past_the_origin() {
        let view = Viewport::new(40.0, 10.0);
        let zoomed = view.zoom_at(0.1, 500.0);
        assert_eq!(zoomed.px_per_hour, MIN_PX_PER_HOUR);
        assert_eq!(zoomed.scroll_left, 0.0);
    }

    #[test]
    fn zoom_at_the_limit_does_not_move_the_view() {
        let view = Viewport::new(MAX_PX_PER_HOUR, 960.0);
        assert_eq!(view.zoom_at(3.0, 120.0), view);
        assert_eq!(view.zoom_at(0.0, 120.0), view);
    }

    #[test]
    fn bar_geometry_subtracts_scroll() {
        let view = Viewport::new(40.0, 100.0);
        let (left, width) = view.bar_geometry(3.0, 1.5);
        assert!(close(left, 20.0));
        assert!(close(width, 60.0));
    }
}
