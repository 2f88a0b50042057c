//! Server-side SVG rendering of a [`ChartSpec`].

use chrono::NaiveDate;

use crate::domain::chart::ChartSpec;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 400.0;
const PAD_LEFT: f64 = 60.0;
const PAD_RIGHT: f64 = 130.0;
const PAD_TOP: f64 = 20.0;
const PAD_BOTTOM: f64 = 40.0;
const Y_TICKS: usize = 5;

struct Frame {
    x0: NaiveDate,
    x_span: f64,
    y_min: f64,
    y_span: f64,
}

impl Frame {
    fn plot_width() -> f64 {
        WIDTH - PAD_LEFT - PAD_RIGHT
    }

    fn plot_height() -> f64 {
        HEIGHT - PAD_TOP - PAD_BOTTOM
    }

    fn x(&self, date: NaiveDate) -> f64 {
        if self.x_span <= 0.0 {
            return PAD_LEFT + Self::plot_width() / 2.0;
        }
        let days = (date - self.x0).num_days() as f64;
        PAD_LEFT + days / self.x_span * Self::plot_width()
    }

    /// Values outside the domain land outside the plot area and are clipped.
    fn y(&self, value: f64) -> f64 {
        HEIGHT - PAD_BOTTOM - (value - self.y_min) / self.y_span * Self::plot_height()
    }
}

pub fn generate_price_svg(chart: &ChartSpec) -> String {
    let Some((start, end)) = chart.x_domain else {
        return format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" class="price-chart">"#,
                r#"<text x="{x}" y="{y}" text-anchor="middle">No price data available.</text></svg>"#
            ),
            w = WIDTH,
            h = HEIGHT,
            x = WIDTH / 2.0,
            y = HEIGHT / 2.0
        );
    };

    let (y_min, y_max) = chart.y_domain;
    let frame = Frame {
        x0: start,
        x_span: (end - start).num_days() as f64,
        y_min,
        y_span: if y_max > y_min { y_max - y_min } else { 1.0 },
    };

    let mut svg = format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" class="price-chart""#,
            r#" font-family="sans-serif" font-size="11">"#
        ),
        w = WIDTH,
        h = HEIGHT
    );
    svg.push_str(&format!(
        concat!(
            r#"<defs><clipPath id="plot-area"><rect x="{}" y="{}" width="{}" height="{}"/>"#,
            "</clipPath></defs>"
        ),
        PAD_LEFT,
        PAD_TOP,
        Frame::plot_width(),
        Frame::plot_height()
    ));

    svg.push_str(&axes(&frame, chart, start, end));

    let clip = if chart.clip { r#" clip-path="url(#plot-area)""# } else { "" };
    for series in &chart.series {
        if let [(date, price)] = series.points.as_slice() {
            svg.push_str(&format!(
                r#"<circle cx="{:.1}" cy="{:.1}" r="3" fill="{}" fill-opacity="{}"{clip}/>"#,
                frame.x(*date),
                frame.y(*price),
                series.color,
                chart.opacity
            ));
            continue;
        }
        let points: Vec<String> = series
            .points
            .iter()
            .map(|(date, price)| format!("{:.1},{:.1}", frame.x(*date), frame.y(*price)))
            .collect();
        svg.push_str(&format!(
            concat!(
                r#"<polyline fill="none" stroke="{}" stroke-width="2" stroke-opacity="{}"{}"#,
                r#" points="{}"/>"#
            ),
            series.color,
            chart.opacity,
            clip,
            points.join(" ")
        ));
    }

    svg.push_str(&legend(chart));
    svg.push_str("</svg>");
    svg
}

fn axes(frame: &Frame, chart: &ChartSpec, start: NaiveDate, end: NaiveDate) -> String {
    let bottom = HEIGHT - PAD_BOTTOM;
    let right = PAD_LEFT + Frame::plot_width();
    let mut out = format!(
        concat!(
            r##"<line x1="{left}" y1="{top}" x2="{left}" y2="{bottom}" stroke="#444"/>"##,
            r##"<line x1="{left}" y1="{bottom}" x2="{right}" y2="{bottom}" stroke="#444"/>"##
        ),
        left = PAD_LEFT,
        top = PAD_TOP,
        bottom = bottom,
        right = right
    );

    let (y_min, y_max) = chart.y_domain;
    let step = (y_max - y_min) / (Y_TICKS - 1) as f64;
    for i in 0..Y_TICKS {
        let value = y_min + step * i as f64;
        let y = frame.y(value);
        out.push_str(&format!(
            concat!(
                r##"<line x1="{left}" y1="{y:.1}" x2="{right}" y2="{y:.1}" stroke="#ddd"/>"##,
                r#"<text x="{tx}" y="{ty:.1}" text-anchor="end" class="y-tick">{label}</text>"#
            ),
            left = PAD_LEFT,
            y = y,
            right = right,
            tx = PAD_LEFT - 6.0,
            ty = y + 4.0,
            label = format_tick(value, y_max - y_min)
        ));
    }

    let mut dates = vec![start];
    if end > start {
        let mid = start + (end - start) / 2;
        if mid > start && mid < end {
            dates.push(mid);
        }
        dates.push(end);
    }
    for date in dates {
        out.push_str(&format!(
            r#"<text x="{:.1}" y="{}" text-anchor="middle" class="x-tick">{}</text>"#,
            frame.x(date),
            bottom + 16.0,
            date.format("%Y-%m-%d")
        ));
    }
    out
}

fn legend(chart: &ChartSpec) -> String {
    let x = WIDTH - PAD_RIGHT + 16.0;
    let mut out = String::new();
    for (i, series) in chart.series.iter().enumerate() {
        let y = PAD_TOP + 18.0 * i as f64;
        out.push_str(&format!(
            concat!(
                r#"<rect x="{x}" y="{y}" width="12" height="12" fill="{}"/>"#,
                r#"<text x="{}" y="{}">{}</text>"#,
            ),
            series.color,
            x + 18.0,
            y + 10.0,
            escape(&series.company),
            x = x,
            y = y
        ));
    }
    out
}

fn format_tick(value: f64, span: f64) -> String {
    if span >= 20.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
