use clap::ValueEnum;
use colored::Colorize;
use routebook_engine::{Dataset, EntryKind, EtaSchedule, LegSource, SelectionView};
use serde::Serialize;
use std::io::{self, Write};

pub const START_TIME_PROMPT: &str = "Enter a start time (HH:MM) to compute ETAs.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Colored, human-readable output
    Console,
    /// One JSON object per line
    Json,
    /// Markdown tables and headings
    Markdown,
    /// Comma-separated rows, one header per block
    Csv,
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Frame<'a> {
    Selection { view: &'a SelectionView },
    Schedule { schedule: &'a EtaSchedule },
    Prompt { message: &'a str },
}

fn write_frame(out: &mut dyn Write, frame: &Frame<'_>) -> io::Result<()> {
    serde_json::to_writer(&mut *out, frame)?;
    writeln!(out)
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

const fn source_label(source: LegSource) -> &'static str {
    match source {
        LegSource::Forward => "forward",
        LegSource::Reverse => "reverse",
        LegSource::Unknown => "unknown",
    }
}

pub fn write_schedule(
    out: &mut dyn Write,
    format: ReportFormat,
    schedule: &EtaSchedule,
) -> io::Result<()> {
    match format {
        ReportFormat::Console => write_schedule_console(out, schedule),
        ReportFormat::Json => write_frame(out, &Frame::Schedule { schedule }),
        ReportFormat::Markdown => write_schedule_markdown(out, schedule),
        ReportFormat::Csv => write_schedule_csv(out, schedule),
    }
}

fn write_schedule_console(out: &mut dyn Write, schedule: &EtaSchedule) -> io::Result<()> {
    writeln!(
        out,
        "{}",
        format!(
            "🕒 ETA · route {} from {} at {}",
            schedule.route_id, schedule.origin, schedule.start_time
        )
        .bright_cyan()
        .bold()
    )?;
    writeln!(out, "{}", "-".repeat(30).cyan())?;

    if schedule.rows.is_empty() {
        writeln!(out, "No legs to travel; already at the end of the route.")?;
    }
    for row in &schedule.rows {
        let leg = format!("{} → {}", row.from, row.to);
        let line = format!(
            "{:>3}  {leg:<36} {:>4} min  {:>5.2} h  {}",
            row.leg_index, row.minutes, row.hours, row.eta
        );
        match row.source {
            LegSource::Forward => writeln!(out, "{line}")?,
            LegSource::Reverse => writeln!(out, "{line}  {}", "(reverse entry)".dimmed())?,
            LegSource::Unknown => writeln!(out, "{}", format!("{line}  (unknown)").yellow())?,
        }
    }

    writeln!(out)?;
    writeln!(
        out,
        "Total: {} min ({:.2} h) · Final ETA {}",
        schedule.summary.total_minutes.to_string().green(),
        schedule.summary.total_hours,
        schedule.summary.final_eta.green().bold()
    )?;

    let unknown = schedule.unknown_legs().count();
    if unknown > 0 {
        writeln!(
            out,
            "{}",
            format!("⚠️  {unknown} leg(s) have no configured time and count as 0 minutes").yellow()
        )?;
    }
    if schedule.entry == Some(EntryKind::Unreachable) {
        writeln!(
            out,
            "{}",
            format!(
                "⚠️  {} has no known leg into this route; the full route was used",
                schedule.origin
            )
            .yellow()
        )?;
    }
    Ok(())
}

fn write_schedule_markdown(out: &mut dyn Write, schedule: &EtaSchedule) -> io::Result<()> {
    writeln!(
        out,
        "## ETA: `{}` from `{}` at {}\n",
        schedule.route_id, schedule.origin, schedule.start_time
    )?;
    writeln!(out, "| Leg | From | To | Minutes | Hours | ETA | Source |")?;
    writeln!(out, "|---:|---|---|---:|---:|---|---|")?;
    for row in &schedule.rows {
        writeln!(
            out,
            "| {} | {} | {} | {} | {:.2} | {} | {} |",
            row.leg_index,
            row.from,
            row.to,
            row.minutes,
            row.hours,
            row.eta,
            source_label(row.source)
        )?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "- **Total**: {} min ({:.2} h)",
        schedule.summary.total_minutes, schedule.summary.total_hours
    )?;
    writeln!(out, "- **Final ETA**: {}", schedule.summary.final_eta)?;
    if schedule.entry == Some(EntryKind::Unreachable) {
        writeln!(out, "- **Warning**: origin has no known leg into this route")?;
    }
    writeln!(out)
}

fn write_schedule_csv(out: &mut dyn Write, schedule: &EtaSchedule) -> io::Result<()> {
    writeln!(out, "leg,from,to,minutes,hours,eta,source")?;
    for row in &schedule.rows {
        writeln!(
            out,
            "{},{},{},{},{:.2},{},{}",
            row.leg_index,
            csv_field(&row.from),
            csv_field(&row.to),
            row.minutes,
            row.hours,
            row.eta,
            source_label(row.source)
        )?;
    }
    Ok(())
}

pub fn write_selection(
    out: &mut dyn Write,
    format: ReportFormat,
    view: &SelectionView,
) -> io::Result<()> {
    match format {
        ReportFormat::Console => write_selection_console(out, view),
        ReportFormat::Json => write_frame(out, &Frame::Selection { view }),
        ReportFormat::Markdown => write_selection_markdown(out, view),
        ReportFormat::Csv => write_selection_csv(out, view),
    }
}

fn write_selection_console(out: &mut dyn Write, view: &SelectionView) -> io::Result<()> {
    let position = if view.pager.len == 0 {
        "-".to_string()
    } else {
        format!("{}/{}", view.pager.index + 1, view.pager.len)
    };
    writeln!(
        out,
        "📍 {} [{}] {}",
        view.route_name.bright_yellow().bold(),
        view.route_id,
        position
    )?;
    let title = if view.panel.detached {
        view.panel.title.red().bold()
    } else {
        view.panel.title.bold()
    };
    writeln!(out, "   {title}")?;
    writeln!(out, "   {}", view.panel.subtitle.dimmed())?;
    if !view.panel.objective.is_empty() {
        writeln!(out, "   Objective: {}", view.panel.objective)?;
    }
    for bullet in &view.panel.bullets {
        writeln!(out, "     • {bullet}")?;
    }

    let active = view.highlight.active_id.as_deref().unwrap_or("none");
    let visibility = if view.highlight.points_visible {
        "hotspots shown"
    } else {
        "hotspots hidden"
    };
    let arrow = |enabled: bool, label: &str| {
        if enabled {
            label.green().to_string()
        } else {
            label.dimmed().to_string()
        }
    };
    writeln!(
        out,
        "   active: {} · dimmed: {} · {} · {} {}",
        active.cyan(),
        view.highlight.dimmed.len(),
        visibility,
        arrow(view.pager.has_prev, "◀ prev"),
        arrow(view.pager.has_next, "next ▶")
    )
}

fn write_selection_markdown(out: &mut dyn Write, view: &SelectionView) -> io::Result<()> {
    writeln!(out, "### {}\n", view.panel.title)?;
    writeln!(out, "_{}_\n", view.panel.subtitle)?;
    if !view.panel.objective.is_empty() {
        writeln!(out, "**Objective**: {}\n", view.panel.objective)?;
    }
    for bullet in &view.panel.bullets {
        writeln!(out, "- {bullet}")?;
    }
    writeln!(
        out,
        "\nActive: `{}` · Hotspots visible: {}\n",
        view.highlight.active_id.as_deref().unwrap_or("none"),
        view.highlight.points_visible
    )
}

fn write_selection_csv(out: &mut dyn Write, view: &SelectionView) -> io::Result<()> {
    writeln!(
        out,
        "route,index,len,active,points_visible,detached,title"
    )?;
    writeln!(
        out,
        "{},{},{},{},{},{},{}",
        csv_field(&view.route_id),
        view.pager.index,
        view.pager.len,
        csv_field(view.highlight.active_id.as_deref().unwrap_or("")),
        view.highlight.points_visible,
        view.panel.detached,
        csv_field(&view.panel.title)
    )
}

pub fn write_prompt(out: &mut dyn Write, format: ReportFormat) -> io::Result<()> {
    match format {
        ReportFormat::Json => write_frame(
            out,
            &Frame::Prompt {
                message: START_TIME_PROMPT,
            },
        ),
        ReportFormat::Console => writeln!(out, "{}", START_TIME_PROMPT.yellow()),
        ReportFormat::Markdown => writeln!(out, "> {START_TIME_PROMPT}\n"),
        ReportFormat::Csv => writeln!(out, "prompt\n{}", csv_field(START_TIME_PROMPT)),
    }
}

pub fn write_routes(out: &mut dyn Write, format: ReportFormat, dataset: &Dataset) -> io::Result<()> {
    match format {
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &dataset.to_document())?;
            writeln!(out)
        }
        ReportFormat::Console => write_routes_console(out, dataset),
        ReportFormat::Markdown => write_routes_markdown(out, dataset),
        ReportFormat::Csv => write_routes_csv(out, dataset),
    }
}

fn write_routes_console(out: &mut dyn Write, dataset: &Dataset) -> io::Result<()> {
    writeln!(out, "{}", "🗺️  Routes".bright_cyan().bold())?;
    writeln!(out, "{}", "=========".cyan())?;
    for route in dataset.catalog.routes() {
        writeln!(
            out,
            "{:<12} {} ({}) - {} checkpoints",
            route.id,
            route.name.bold(),
            route.color,
            route.len()
        )?;
        for (index, point) in route.points.iter().enumerate() {
            writeln!(out, "   {:>2}. {:<14} {}", index + 1, point.id, point.title)?;
        }
    }
    if !dataset.origins.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", "External origins".bright_yellow().bold())?;
        for origin in &dataset.origins {
            writeln!(out, "   {:<14} {}", origin.id, origin.label)?;
        }
    }
    Ok(())
}

fn write_routes_markdown(out: &mut dyn Write, dataset: &Dataset) -> io::Result<()> {
    writeln!(out, "# Routes\n")?;
    for route in dataset.catalog.routes() {
        writeln!(out, "## {} (`{}`)\n", route.name, route.id)?;
        for (index, point) in route.points.iter().enumerate() {
            writeln!(out, "{}. **{}** - {}", index + 1, point.id, point.title)?;
        }
        writeln!(out)?;
    }
    if !dataset.origins.is_empty() {
        writeln!(out, "## External origins\n")?;
        for origin in &dataset.origins {
            writeln!(out, "- **{}** - {}", origin.id, origin.label)?;
        }
    }
    Ok(())
}

fn write_routes_csv(out: &mut dyn Write, dataset: &Dataset) -> io::Result<()> {
    writeln!(out, "route,position,checkpoint,title")?;
    for route in dataset.catalog.routes() {
        for (index, point) in route.points.iter().enumerate() {
            writeln!(
                out,
                "{},{},{},{}",
                csv_field(&route.id),
                index + 1,
                csv_field(&point.id),
                csv_field(&point.title)
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use routebook_engine::{LegGraph, compute_schedule};

    fn dataset() -> Dataset {
        Dataset::embedded().unwrap()
    }

    fn render(f: impl FnOnce(&mut dyn Write) -> io::Result<()>) -> String {
        colored::control::set_override(false);
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn csv_schedule_lists_every_leg() {
        let data = dataset();
        let route = data.catalog.get("north").unwrap();
        let schedule = compute_schedule("06:00", "gate-north", route, &data.legs);
        let text = render(|out| write_schedule(out, ReportFormat::Csv, &schedule));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "leg,from,to,minutes,hours,eta,source");
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[1], "1,gate-north,water-tower,14,0.23,06:14,forward");
        assert!(lines[6].ends_with("07:09,forward"));
    }

    #[test]
    fn json_schedule_is_one_tagged_line() {
        let data = dataset();
        let route = data.catalog.first();
        let schedule = compute_schedule("06:00", "depot-main", route, &data.legs);
        let text = render(|out| write_schedule(out, ReportFormat::Json, &schedule));
        assert_eq!(text.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(value["kind"], "schedule");
        assert_eq!(value["schedule"]["summary"]["final_eta"], "07:21");
        assert_eq!(value["schedule"]["rows"][0]["source"], "forward");
    }

    #[test]
    fn console_schedule_warns_about_unknown_legs() {
        let data = dataset();
        let route = data.catalog.first();
        let legs = LegGraph::new();
        let schedule = compute_schedule("06:00", "gate-north", route, &legs);
        let text = render(|out| write_schedule(out, ReportFormat::Console, &schedule));
        assert!(text.contains("6 leg(s) have no configured time"));
        assert!(text.contains("Final ETA 06:00"));
    }

    #[test]
    fn markdown_selection_shows_panel() {
        let data = dataset();
        let controller = routebook_engine::SelectionController::new(data.catalog);
        let text = render(|out| write_selection(out, ReportFormat::Markdown, &controller.view()));
        assert!(text.starts_with("### North Gate"));
        assert!(text.contains("_North Corridor · Checkpoint 1 of 7_"));
        assert!(text.contains("- Log departure time"));
    }

    #[test]
    fn csv_fields_are_quoted_when_needed() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn routes_listing_includes_origins() {
        let data = dataset();
        let text = render(|out| write_routes(out, ReportFormat::Console, &data));
        assert!(text.contains("North Corridor"));
        assert!(text.contains("depot-south"));
        let csv = render(|out| write_routes(out, ReportFormat::Csv, &data));
        assert!(csv.contains("river,2,ford,Lower Ford"));
    }

    #[test]
    fn prompt_renders_in_every_format() {
        for format in [
            ReportFormat::Console,
            ReportFormat::Json,
            ReportFormat::Markdown,
            ReportFormat::Csv,
        ] {
            let text = render(|out| write_prompt(out, format));
            assert!(text.contains("start time"), "{format:?}");
        }
    }
}
