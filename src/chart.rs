use std::io::{self, Write};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::harvest::{format_date, trend::DailyTotal};

const HEIGHT: usize = 10;
const COLUMN_WIDTH: usize = 3;

/// A titled series of labelled points, x in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<(String, Decimal)>,
}

impl LineChart {
    pub fn harvest_over_time(totals: &[DailyTotal]) -> LineChart {
        LineChart {
            title: "Total Rose Harvest Over Time".to_string(),
            x_label: "Date".to_string(),
            y_label: "Quantity (kg)".to_string(),
            points: totals.iter().map(|t| (format_date(t.date), t.quantity_kg)).collect(),
        }
    }
}

/// Somewhere a chart can be shown.
pub trait ChartSink {
    fn draw(&mut self, chart: &LineChart) -> io::Result<()>;
}

/// Draws charts as text: one column per point, `o` markers over a dotted grid,
/// x labels written top to bottom under the axis.
pub struct TerminalChart<W: Write> {
    out: W,
}

impl<W: Write> TerminalChart<W> {
    pub fn new(out: W) -> TerminalChart<W> {
        TerminalChart { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ChartSink for TerminalChart<W> {
    fn draw(&mut self, chart: &LineChart) -> io::Result<()> {
        self.out.write_all(render(chart).as_bytes())?;
        self.out.flush()
    }
}

pub fn render(chart: &LineChart) -> String {
    let mut lines = vec![chart.title.clone(), chart.y_label.clone()];
    if chart.points.is_empty() {
        lines.push("(no data)".to_string());
        return lines.join("\n") + "\n";
    }

    let values: Vec<f64> = chart.points.iter().map(|(_, v)| v.to_f64().unwrap_or(0.0)).collect();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let levels: Vec<usize> = values.iter().map(|v| level(*v, min, max)).collect();

    let axis_width = format!("{:.1}", max).len().max(format!("{:.1}", min).len());

    for row in (0..HEIGHT).rev() {
        let label = if row == 0 || row == HEIGHT - 1 || row == (HEIGHT - 1) / 2 {
            format!("{:.1}", min + (max - min) * row as f64 / (HEIGHT - 1) as f64)
        } else {
            String::new()
        };

        let mut line = format!("{:>width$} |", label, width = axis_width);
        for point in &levels {
            line.push_str(if *point == row { " o " } else { " . " });
        }
        lines.push(line.trim_end().to_string());
    }

    lines.push(format!("{:>width$} +{}", "", "-".repeat(COLUMN_WIDTH * levels.len()), width = axis_width));

    let labels: Vec<Vec<char>> = chart.points.iter().map(|(label, _)| label.chars().collect()).collect();
    let label_height = labels.iter().map(Vec::len).max().unwrap_or(0);
    for i in 0..label_height {
        let mut line = format!("{:>width$}  ", "", width = axis_width);
        for label in &labels {
            line.push(' ');
            line.push(label.get(i).copied().unwrap_or(' '));
            line.push(' ');
        }
        lines.push(line.trim_end().to_string());
    }

    lines.push(format!("{:>width$}  {}", "", chart.x_label, width = axis_width));

    lines.join("\n") + "\n"
}

fn level(value: f64, min: f64, max: f64) -> usize {
    if max - min <= f64::EPSILON {
        return (HEIGHT - 1) / 2;
    }

    ((value - min) / (max - min) * (HEIGHT - 1) as f64).round() as usize
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn chart(points: &[(&str, Decimal)]) -> LineChart {
        LineChart {
            title: "Total Rose Harvest Over Time".into(),
            x_label: "Date".into(),
            y_label: "Quantity (kg)".into(),
            points: points.iter().map(|(l, v)| (l.to_string(), *v)).collect(),
        }
    }

    #[test]
    fn test_render_places_markers_by_value() {
        let text = render(&chart(&[("01-05-25", dec!(10)), ("02-05-25", dec!(20))]));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Total Rose Harvest Over Time");
        assert_eq!(lines[1], "Quantity (kg)");
        assert_eq!(lines[2], "20.0 | .  o");
        assert_eq!(lines[11], "10.0 | o  .");
        assert_eq!(lines[12], "     +------");
        assert_eq!(text.matches('o').count(), 2 + "Total Rose Harvest Over Time".matches('o').count());
    }

    #[test]
    fn test_render_writes_labels_vertically() {
        let text = render(&chart(&[("01-05-25", dec!(10)), ("02-05-25", dec!(20))]));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[13], "       0  0");
        assert_eq!(lines[14], "       1  2");
        assert_eq!(lines[15], "       -  -");
        assert_eq!(lines.last().copied(), Some("      Date"));
    }

    #[test]
    fn test_render_flat_series_sits_mid_height() {
        let text = render(&chart(&[("01-05-25", dec!(5)), ("02-05-25", dec!(5))]));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[2 + (HEIGHT - 1) - (HEIGHT - 1) / 2], "5.0 | o  o");
    }

    #[test]
    fn test_render_empty_chart() {
        assert_eq!(
            render(&chart(&[])),
            "Total Rose Harvest Over Time\nQuantity (kg)\n(no data)\n"
        );
    }

    #[test]
    fn test_terminal_chart_writes_to_output() -> Result<()> {
        let mut sink = TerminalChart::new(Vec::new());
        sink.draw(&chart(&[("01-05-25", dec!(1))]))?;

        let written = String::from_utf8(sink.into_inner())?;
        assert_eq!(written.starts_with("Total Rose Harvest Over Time\n"), true);

        Ok(())
    }
}
