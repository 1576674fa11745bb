use gpui::*;
use gpui_component::Root;
use tracing_subscriber::EnvFilter;

mod dnd_group;

use crate::dnd_group::DndGroupExample;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,gpui_dnd_group=debug,gpui_dnd_group_core=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() {
    init_logging();
    let app = Application::new();

    app.run(move |cx| {
        gpui_component::init(cx);
        cx.activate(true);

        cx.spawn(async move |cx| {
            cx.open_window(
                WindowOptions {
                    titlebar: Some(TitlebarOptions {
                        title: Some("Grouped DnD".into()),
                        appears_transparent: false,
                        traffic_light_position: None,
                    }),
                    ..Default::default()
                },
                |window, cx| {
                    let view = DndGroupExample::view(window, cx);
                    cx.new(|cx| Root::new(view, window, cx))
                },
            )?;

            Ok::<_, anyhow::Error>(())
        })
        .detach();
    });
}
