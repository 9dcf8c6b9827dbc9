use console::Style;
use fieldrot_core::observer::ObserverSource;
use fieldrot_core::pipeline::config::SessionConfig;
use fieldrot_core::session::Session;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
    warning: Style,
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
            warning: Style::new().yellow(),
        }
    }
}

pub fn print_session_summary(config: &SessionConfig, title: &str) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to(title));
    println!(
        "  {}",
        s.title.apply_to("\u{2550}".repeat(title.chars().count()))
    );
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(config.input_dir.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Extensions"),
        s.value.apply_to(config.extensions.join(", "))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(config.output_dir.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Body"),
        s.value.apply_to(config.body)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Ephemeris"),
        s.method.apply_to(&config.ephemeris)
    );
    match &config.observer {
        ObserverSource::Literal(obs) => println!(
            "  {:<14}{}",
            s.label.apply_to("Observer"),
            s.value.apply_to(format!("{:.5}, {:.5}", obs.latitude, obs.longitude))
        ),
        ObserverSource::Place { name, on_failure } => println!(
            "  {:<14}{} {}",
            s.label.apply_to("Observer"),
            s.value.apply_to(name),
            s.label.apply_to(format!("(on failure: {on_failure})"))
        ),
    }
    println!();

    println!("  {}", s.header.apply_to("Integration"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Fit"),
        s.method.apply_to(config.integration.fit)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Malformed"),
        s.value.apply_to(format!("{:?}", config.integration.malformed))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Undefined"),
        s.value.apply_to(format!("{:?}", config.integration.undefined_rate))
    );
    println!();

    println!("  {}", s.header.apply_to("De-rotation"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Base angle"),
        s.value.apply_to(format!("{}\u{b0}", config.derotation.base_angle_deg))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Suffix"),
        s.value.apply_to(&config.derotation.output_suffix)
    );
    match &config.derotation.border {
        Some(border) => println!(
            "    {:<12}{}",
            s.label.apply_to("Border"),
            s.value.apply_to(format!("{} px {:?}", border.width, border.color))
        ),
        None => println!(
            "    {:<12}{}",
            s.label.apply_to("Border"),
            s.disabled.apply_to("disabled")
        ),
    }
    println!();
}

/// Per-frame table of the integrated series, followed by any frame issues.
pub fn print_series_table(session: &Session) {
    let s = Styles::new();

    println!(
        "{:>6}  {:<28} {:>9} {:>9} {:>13} {:>11}",
        "t [s]", "Frame", "Alt", "Az", "Rate [\u{b0}/s]", "Cum [\u{b0}]"
    );
    println!("{}", "-".repeat(82));
    for (sample, cum) in session.samples.iter().zip(&session.cumulative) {
        let name = sample
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let rate = match sample.rotation_rate {
            Some(r) => format!("{r:>13.6e}"),
            None => format!("{:>13}", "undefined"),
        };
        println!(
            "{:>6}  {:<28} {:>9.3} {:>9.3} {} {:>11.4}",
            sample.elapsed_seconds,
            truncate(&name, 28),
            sample.position.altitude,
            sample.position.azimuth,
            rate,
            cum
        );
    }

    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Frames"),
        s.value.apply_to(session.frame_count())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Fit degree"),
        s.value.apply_to(
            session
                .fit_degree
                .map(|d| d.to_string())
                .unwrap_or_else(|| "none".into())
        )
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Total"),
        s.value.apply_to(format!("{:.4}\u{b0}", session.total_rotation()))
    );

    if !session.issues.is_empty() {
        println!();
        println!("  {}", s.header.apply_to("Issues"));
        for issue in &session.issues {
            println!(
                "    {} {}",
                s.warning.apply_to(format!("{:?}", issue.kind)),
                issue.message
            );
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let keep: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{keep}\u{2026}")
    }
}
