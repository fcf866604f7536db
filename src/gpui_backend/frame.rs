use gpui::{Bounds, Pixels, Window};

use crate::axis::AxisScale;
use crate::canvas::RenderPass;
use crate::geom::{Point as DataPoint, ScreenPoint, ScreenRect};
use crate::render::{
    Color, LineSegment, LineStyle, RectStyle, RenderCommand, RenderList, TextMeasurer, TextStyle,
};
use crate::transform::Transform;

use super::config::MeasureViewConfig;
use super::state::{MeasureWidgets, SurfaceState};
use super::text::GpuiTextMeasurer;

const TICK_LABEL_SIZE: f32 = 11.0;
const TICK_LABEL_GAP: f32 = 4.0;
const MESSAGE_SIZE: f32 = 14.0;

#[derive(Debug, Clone)]
pub(crate) struct MeasureFrame {
    pub(crate) base: RenderList,
    pub(crate) overlay: RenderList,
}

/// Lay out the axes and produce the lists to paint.
///
/// The static base is only rebuilt when the layout changed or a full redraw
/// was requested; otherwise the cached base is repainted together with the
/// overlay drawn by the widgets since the last restore.
pub(crate) fn build_frame(
    surface: &mut SurfaceState,
    widgets: &MeasureWidgets,
    config: &MeasureViewConfig,
    bounds: Bounds<Pixels>,
    window: &Window,
) -> MeasureFrame {
    let full_width = f32::from(bounds.size.width);
    let full_height = f32::from(bounds.size.height);
    if full_width <= 1.0 || full_height <= 1.0 {
        return MeasureFrame {
            base: RenderList::new(),
            overlay: RenderList::new(),
        };
    }

    let origin = ScreenPoint::new(f32::from(bounds.origin.x), f32::from(bounds.origin.y));
    let padding = config
        .padding_px
        .clamp(0.0, (full_width.min(full_height) * 0.5 - 1.0).max(0.0));
    let plot_rect = ScreenRect::new(
        ScreenPoint::new(origin.x + padding, origin.y + padding),
        ScreenPoint::new(
            origin.x + full_width - padding,
            origin.y + full_height - padding,
        ),
    );

    let measurer = GpuiTextMeasurer::new(window);

    if surface.plot_rect != Some(plot_rect) {
        surface.plot_rect = Some(plot_rect);
        surface.transform = Transform::new(config.viewport, plot_rect, config.x_scale, config.y_scale);
        surface.full_redraw = true;
        // Overlay positions were computed for the old layout.
        surface.overlay.clear();
        if let Some(transform) = surface.transform.as_ref() {
            widgets.render(transform, &measurer, RenderPass::Animated, &mut surface.overlay);
        }
    }

    if surface.full_redraw {
        surface.full_redraw = false;
        surface.generation = surface.generation.wrapping_add(1);
        surface.base = build_base(surface, widgets, config, plot_rect, &measurer);
        tracing::trace!(generation = surface.generation, "rebuilt static scene");
    }

    MeasureFrame {
        base: surface.base.clone(),
        overlay: surface.overlay.clone(),
    }
}

fn build_base(
    surface: &SurfaceState,
    widgets: &MeasureWidgets,
    config: &MeasureViewConfig,
    plot_rect: ScreenRect,
    measurer: &dyn TextMeasurer,
) -> RenderList {
    let theme = &config.theme;
    let mut render = RenderList::new();
    render.push(RenderCommand::Rect {
        rect: plot_rect,
        style: RectStyle {
            fill: theme.axes_fill,
            stroke: Color::TRANSPARENT,
            stroke_width: 0.0,
            corner_radius: 0.0,
        },
    });

    let Some(transform) = surface.transform.as_ref() else {
        let message = "Invalid axis range";
        let size = measurer.measure(message, MESSAGE_SIZE);
        render.push(RenderCommand::Text {
            position: ScreenPoint::new(
                plot_rect.min.x + (plot_rect.width() - size.0) * 0.5,
                plot_rect.min.y + (plot_rect.height() - size.1) * 0.5,
            ),
            text: message.to_string(),
            style: TextStyle {
                color: theme.tick_label,
                size: MESSAGE_SIZE,
            },
        });
        return render;
    };

    let divisions = config.grid_divisions.max(1);
    if config.show_grid {
        build_grid(&mut render, plot_rect, divisions, theme.grid);
    }

    render.push(RenderCommand::Rect {
        rect: plot_rect,
        style: RectStyle {
            fill: Color::TRANSPARENT,
            stroke: theme.axes_border,
            stroke_width: 1.0,
            corner_radius: 0.0,
        },
    });

    if config.show_tick_labels {
        build_tick_labels(&mut render, transform, config, divisions, measurer);
    }

    widgets.render(transform, measurer, RenderPass::Full, &mut render);
    render
}

fn build_grid(render: &mut RenderList, plot_rect: ScreenRect, divisions: usize, color: Color) {
    let mut segments = Vec::with_capacity((divisions - 1) * 2);
    for i in 1..divisions {
        let frac = i as f32 / divisions as f32;
        let x = plot_rect.min.x + plot_rect.width() * frac;
        let y = plot_rect.min.y + plot_rect.height() * frac;
        segments.push(LineSegment::new(
            ScreenPoint::new(x, plot_rect.min.y),
            ScreenPoint::new(x, plot_rect.max.y),
        ));
        segments.push(LineSegment::new(
            ScreenPoint::new(plot_rect.min.x, y),
            ScreenPoint::new(plot_rect.max.x, y),
        ));
    }
    if segments.is_empty() {
        return;
    }
    render.push(RenderCommand::ClipRect(plot_rect));
    render.push(RenderCommand::LineSegments {
        segments,
        style: LineStyle { color, width: 1.0 },
    });
    render.push(RenderCommand::ClipEnd);
}

fn build_tick_labels(
    render: &mut RenderList,
    transform: &Transform,
    config: &MeasureViewConfig,
    divisions: usize,
    measurer: &dyn TextMeasurer,
) {
    let rect = transform.screen();
    let style = TextStyle {
        color: config.theme.tick_label,
        size: TICK_LABEL_SIZE,
    };

    let x_values = tick_values(transform, divisions, true);
    for (i, value) in x_values.iter().enumerate() {
        let label = tick_label(*value, neighbour_step(&x_values, i), config.x_scale);
        let size = measurer.measure(&label, TICK_LABEL_SIZE);
        let frac = i as f32 / divisions as f32;
        let x = rect.min.x + rect.width() * frac;
        render.push(RenderCommand::Text {
            position: ScreenPoint::new(x - size.0 * 0.5, rect.max.y + TICK_LABEL_GAP),
            text: label,
            style: style.clone(),
        });
    }

    let y_values = tick_values(transform, divisions, false);
    for (i, value) in y_values.iter().enumerate() {
        let label = tick_label(*value, neighbour_step(&y_values, i), config.y_scale);
        let size = measurer.measure(&label, TICK_LABEL_SIZE);
        let frac = i as f32 / divisions as f32;
        let y = rect.max.y - rect.height() * frac;
        render.push(RenderCommand::Text {
            position: ScreenPoint::new(
                rect.min.x - size.0 - TICK_LABEL_GAP,
                y - size.1 * 0.5,
            ),
            text: label,
            style: style.clone(),
        });
    }
}

/// Data values at evenly spaced screen positions along one axis.
fn tick_values(transform: &Transform, divisions: usize, horizontal: bool) -> Vec<f64> {
    (0..=divisions)
        .filter_map(|i| {
            let frac = i as f64 / divisions as f64;
            let screen = if horizontal {
                transform.axes_fraction_to_screen(frac, 0.0)
            } else {
                transform.axes_fraction_to_screen(0.0, frac)
            };
            transform
                .screen_to_data(screen)
                .map(|point: DataPoint| if horizontal { point.x } else { point.y })
        })
        .collect()
}

fn neighbour_step(values: &[f64], index: usize) -> f64 {
    let prev = index
        .checked_sub(1)
        .and_then(|i| values.get(i))
        .map(|v| (values[index] - v).abs());
    let next = values.get(index + 1).map(|v| (v - values[index]).abs());
    match (prev, next) {
        (Some(a), Some(b)) => a.min(b),
        (Some(a), None) | (None, Some(a)) => a,
        (None, None) => 0.0,
    }
}

fn tick_label(value: f64, step: f64, scale: AxisScale) -> String {
    if scale == AxisScale::Log10 && (value.abs() >= 1.0e4 || value.abs() < 1.0e-3) {
        return format!("{value:.1e}");
    }
    let decimals = if step > 0.0 && step.is_finite() {
        (-step.log10().floor()).clamp(0.0, 6.0) as usize
    } else {
        0
    };
    let label = format!("{value:.decimals$}");
    // Avoid "-0" at the origin.
    if label.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        label.trim_start_matches('-').to_string()
    } else {
        label
    }
}
