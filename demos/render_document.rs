//! Print the canvas calls for a pen document.
//!
//! `cargo run --example render_document --features tracing -- doc.json`

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let input = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("Error: cannot read {path}: {e}");
                std::process::exit(1);
            }
        },
        None => r##"{
            "pens": [
                {"id": "box", "name": "rectangle", "x": 10, "y": 10, "width": 200, "height": 80,
                 "background": "#eef", "text": "Hello"},
                {"id": "arrow", "parentId": "box", "name": "rightArrow",
                 "x": 0.1, "y": 0.6, "width": 0.8, "height": 20}
            ]
        }"##
        .to_string(),
    };

    match topopen::record(&input) {
        Ok(calls) => print!("{calls}"),
        Err(e) => eprintln!("Error: {e:?}"),
    }
}
