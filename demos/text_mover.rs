use gpui::{AppContext, Application, Bounds, WindowBounds, WindowOptions, px, size};
use tracing_subscriber::EnvFilter;

use gpui_measure::{
    Color, GpuiMeasureView, MeasureViewConfig, Point, RulerConfig, TextMoverConfig, TextStyle,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gpui_measure=debug")),
        )
        .init();

    Application::new().run(|cx| {
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                None,
                size(px(720.0), px(480.0)),
                cx,
            ))),
            ..Default::default()
        };

        cx.open_window(options, |_window, cx| {
            // The ruler starts inactive; press "m" to measure between labels.
            let view = GpuiMeasureView::new(
                MeasureViewConfig::default(),
                RulerConfig::default(),
                TextMoverConfig::default(),
                cx,
            )
            .expect("valid measurement configuration");

            let labels = [
                ("drag me", Point::new(1.0, 8.0), Color::BLACK),
                ("peak", Point::new(4.5, 6.0), Color::new(0.8, 0.1, 0.1, 1.0)),
                ("baseline", Point::new(6.0, 1.5), Color::new(0.1, 0.4, 0.8, 1.0)),
            ];
            view.handle().write(|widgets| {
                for (text, position, color) in labels {
                    let style = TextStyle { color, size: 16.0 };
                    widgets
                        .text_mover_mut()
                        .add_text(text, position, style)
                        .expect("finite label position");
                }
            });

            cx.new(|_| view)
        })
        .unwrap();
    });
}
