use console::Style;
use greenkey_core::batch::BatchSummary;
use greenkey_core::pipeline::PipelineConfig;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
    error: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
            error: Style::new().red().bold(),
        }
    }
}

pub fn print_pipeline_summary(config: &PipelineConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Greenkey Pipeline"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(17)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(config.source_dir.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(config.output_dir.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Background"),
        s.path.apply_to(config.background_image_path.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Threads"),
        s.value.apply_to(match config.threads {
            Some(n) => n.to_string(),
            None => "all cores".to_string(),
        })
    );
    println!();

    // Matte
    println!("  {}", s.header.apply_to("Matte"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Opening"),
        s.value.apply_to(format!(
            "{0}x{0} kernel, {1} pass(es)",
            config.refine.kernel_size, config.refine.iterations
        ))
    );
    if config.refine.blend_edges {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Edge blend"),
            s.value.apply_to(format!(
                "{} px ring, sigma {:.1}",
                config.refine.border_thickness, config.refine.blend_sigma
            ))
        );
    } else {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Edge blend"),
            s.disabled.apply_to("disabled")
        );
    }
    if config.spill.enabled {
        let w = config.spill.weights;
        println!(
            "    {:<12}{}",
            s.label.apply_to("Spill"),
            s.method.apply_to(format!(
                "B {:.2} / G {:.2} / R {:.2}",
                w.blue, w.green, w.red
            ))
        );
    } else {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Spill"),
            s.disabled.apply_to("disabled")
        );
    }
    println!();

    // Framing
    println!("  {}", s.header.apply_to("Framing"));
    if config.use_face_detection {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Center"),
            s.method.apply_to(format!("face ({})", config.face_pick))
        );
        println!(
            "    {:<12}{}",
            s.label.apply_to("Model"),
            s.path.apply_to(config.face_model_path.display())
        );
    } else {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Center"),
            s.disabled.apply_to("image center")
        );
    }
    println!(
        "    {:<12}{}",
        s.label.apply_to("Margins"),
        s.value.apply_to(format!(
            "{:.0}% x {:.0}%",
            config.crop_margin_width * 100.0,
            config.crop_margin_height * 100.0
        ))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Width"),
        s.value.apply_to(format!("{} px", config.output_width))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Rotation"),
        s.value.apply_to(config.rotation)
    );
    println!();
}

pub fn print_batch_summary(summary: &BatchSummary) {
    let s = Styles::new();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Total"),
        s.value.apply_to(summary.total)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Processed"),
        s.method.apply_to(summary.processed)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Skipped"),
        s.disabled.apply_to(summary.skipped)
    );
    if summary.failed > 0 {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Failed"),
            s.error.apply_to(summary.failed)
        );
    }
}
