use tracing_subscriber::EnvFilter;
use vmldraw::draw::{GradientConfig, StopConfig};
use vmldraw::{
    Engine, Rotation, Sprite, SpriteType, Surface, SurfaceConfig, TextAnchor, Translation,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vmldraw=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut surface = Engine::vml(SurfaceConfig::default().with_size(400.0, 300.0));

    let sky = GradientConfig {
        id: "sky".into(),
        angle: Some(90.0),
        stops: vec![StopConfig::new(0.0, "#87ceeb"), StopConfig::new(100.0, "white")],
        ..Default::default()
    };
    let sprites = [
        Sprite::new("backdrop", SpriteType::Rect).with(|a| {
            a.width = Some(400.0);
            a.height = Some(300.0);
            a.fill = Some("url(#sky)".into());
            a.z_index = -1;
        }),
        Sprite::new("sun", SpriteType::Circle).with(|a| {
            a.x = Some(320.0);
            a.y = Some(60.0);
            a.radius = Some(30.0);
            a.fill = Some("gold".into());
            a.stroke = Some("orange".into());
            a.stroke_width = Some(0.5);
        }),
        Sprite::new("roof", SpriteType::Path).with(|a| {
            a.path = "M100,180 L160,120 L220,180 Z".parse().ok();
            a.fill = Some("maroon".into());
        }),
        Sprite::new("house", SpriteType::Rect).with(|a| {
            a.x = Some(110.0);
            a.y = Some(180.0);
            a.width = Some(100.0);
            a.height = Some(80.0);
            a.radius = Some(4.0);
            a.fill = Some("#ddd".into());
            a.stroke = Some("#333".into());
            a.stroke_width = Some(2.0);
        }),
        Sprite::new("sign", SpriteType::Text).with(|a| {
            a.x = Some(160.0);
            a.y = Some(280.0);
            a.text = Some("Home &amp; Garden".into());
            a.text_anchor = Some(TextAnchor::Middle);
            a.rotation = Some(Rotation {
                degrees: -5.0,
                ..Default::default()
            });
            a.translation = Some(Translation { x: 0.0, y: 4.0 });
        }),
    ];

    let result = surface.add_gradient(&sky).and_then(|()| {
        for sprite in sprites {
            surface.add(sprite)?;
        }
        surface.render_all()
    });
    if let Err(e) = result {
        eprintln!("Error: {:?}", miette::Report::new(e));
        return;
    }

    match surface.bbox("sign", true) {
        Ok(bbox) => eprintln!("sign bbox: {:?}", bbox),
        Err(e) => eprintln!("Error: {}", e),
    }
    match surface.markup() {
        Ok(markup) => println!("{}", markup),
        Err(e) => eprintln!("Error: {:?}", miette::Report::new(e)),
    }
}
