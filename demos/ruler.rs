use gpui::{AppContext, Application, Bounds, WindowBounds, WindowOptions, px, size};
use tracing_subscriber::EnvFilter;

use gpui_measure::{
    AngleUnit, Color, GpuiMeasureView, LineStyle, MeasureViewConfig, Range, RulerConfig, Theme,
    TextMoverConfig, Viewport,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,gpui_measure=debug")),
        )
        .init();

    Application::new().run(|cx| {
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                None,
                size(px(720.0), px(560.0)),
                cx,
            ))),
            ..Default::default()
        };

        cx.open_window(options, |_window, cx| {
            let config = MeasureViewConfig::default()
                .with_viewport(Viewport::new(Range::new(-5.0, 5.0), Range::new(-4.0, 4.0)))
                .with_theme(Theme::dark());

            // Press "m" to toggle the ruler, "ctrl+m" to hide it. Hold shift or
            // control while dragging to constrain the segment.
            let ruler = RulerConfig::default()
                .with_active(true)
                .with_blit(true)
                .with_logging(true)
                .with_angle_unit(AngleUnit::Degrees)
                .with_length_unit("m")
                .with_line_label(true)
                .with_two_click(true)
                .with_line_style(LineStyle {
                    color: Color::new(0.95, 0.6, 0.2, 1.0),
                    width: 2.0,
                });

            let view = GpuiMeasureView::new(config, ruler, TextMoverConfig::default(), cx)
                .expect("valid measurement configuration");
            cx.new(|_| view)
        })
        .unwrap();
    });
}
