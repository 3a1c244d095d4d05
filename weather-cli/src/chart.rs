//! Plain-text multi-series line chart.

use std::ops::Range;

use itertools::{Itertools, MinMaxResult};

const Y_LABEL_WIDTH: usize = 8;

/// One plotted series.
#[derive(Debug, Clone)]
pub struct Series {
    pub label: String,
    pub glyph: char,
    pub values: Vec<f64>,
}

/// Line chart over a shared y axis; x positions are the indices of `x_labels`.
#[derive(Debug, Clone)]
pub struct LineChart {
    x_labels: Vec<String>,
    series: Vec<Series>,
    height: usize,
    column_width: usize,
}

impl LineChart {
    pub fn new(x_labels: Vec<String>) -> Self {
        Self {
            x_labels,
            series: Vec::new(),
            height: 12,
            column_width: 3,
        }
    }

    pub fn add_series(mut self, label: impl Into<String>, glyph: char, values: Vec<f64>) -> Self {
        self.series.push(Series {
            label: label.into(),
            glyph,
            values,
        });
        self
    }

    /// Number of text rows used by the plot area.
    pub fn set_height(mut self, height: usize) -> Self {
        self.height = height.max(2);
        self
    }

    /// Horizontal distance between two consecutive samples.
    pub fn set_column_width(mut self, width: usize) -> Self {
        self.column_width = width.max(1);
        self
    }

    fn y_range(&self) -> Option<Range<f64>> {
        let all = self.series.iter().flat_map(|s| s.values.iter().copied());
        match all.minmax_by(|a, b| a.total_cmp(b)) {
            MinMaxResult::NoElements => None,
            MinMaxResult::OneElement(v) => Some(v - 1.0..v + 1.0),
            MinMaxResult::MinMax(min, max) if min == max => Some(min - 1.0..max + 1.0),
            MinMaxResult::MinMax(min, max) => Some(min..max),
        }
    }

    fn row_of(&self, value: f64, range: &Range<f64>) -> usize {
        let top = (self.height - 1) as f64;
        let row = scale_between_ranges(value, range, &(top..0.0)).round();
        row.clamp(0.0, top) as usize
    }

    pub fn render(&self) -> String {
        let samples = self.x_labels.len();
        let Some(range) = self.y_range().filter(|_| samples > 0) else {
            return "(no hourly data)\n".to_string();
        };

        let width = (samples - 1) * self.column_width + 1;
        let mut grid = vec![vec![' '; width]; self.height];

        for series in &self.series {
            let points: Vec<(usize, usize)> = series
                .values
                .iter()
                .take(samples)
                .enumerate()
                .map(|(i, v)| (i * self.column_width, self.row_of(*v, &range)))
                .collect();

            for ((x0, y0), (x1, y1)) in points.iter().copied().tuple_windows() {
                for x in x0 + 1..x1 {
                    let y = scale_between_ranges(
                        x as f64,
                        &(x0 as f64..x1 as f64),
                        &(y0 as f64..y1 as f64),
                    )
                    .round() as usize;
                    grid[y][x] = '.';
                }
            }
            for (x, y) in points {
                grid[y][x] = series.glyph;
            }
        }

        let mid = (range.start + range.end) / 2.0;
        let mut out = String::new();
        for (row, cells) in grid.iter().enumerate() {
            let tick = match row {
                0 => Some(range.end),
                r if r == self.height - 1 => Some(range.start),
                r if r == (self.height - 1) / 2 => Some(mid),
                _ => None,
            };
            let axis = match tick {
                Some(v) => format!("{v:>w$.1} |", w = Y_LABEL_WIDTH - 2),
                None => format!("{:>w$}|", "", w = Y_LABEL_WIDTH - 1),
            };
            let line: String = cells.iter().collect();
            out.push_str(&axis);
            out.push_str(line.trim_end());
            out.push('\n');
        }

        out.push_str(&format!("{:>w$}+{}\n", "", "-".repeat(width), w = Y_LABEL_WIDTH - 1));
        out.push_str(&self.x_axis_labels(width));
        out.push_str(&self.legend());
        out
    }

    fn x_axis_labels(&self, width: usize) -> String {
        let mut line = vec![' '; width + self.x_labels.iter().map(String::len).max().unwrap_or(0)];
        let mut next_free = 0;
        for (i, label) in self.x_labels.iter().enumerate() {
            let x = i * self.column_width;
            if x < next_free {
                continue;
            }
            for (offset, ch) in label.chars().enumerate() {
                line[x + offset] = ch;
            }
            next_free = x + label.chars().count() + 1;
        }
        let text: String = line.into_iter().collect();
        format!("{:>w$}{}\n", "", text.trim_end(), w = Y_LABEL_WIDTH)
    }

    fn legend(&self) -> String {
        let entries = self.series.iter().map(|s| format!("{} {}", s.glyph, s.label)).join("   ");
        format!("{:>w$}{entries}\n", "", w = Y_LABEL_WIDTH)
    }
}

/// Map `value` from `input` onto `output` linearly.
fn scale_between_ranges(value: f64, input: &Range<f64>, output: &Range<f64>) -> f64 {
    (value - input.start) * (output.end - output.start) / (input.end - input.start) + output.start
}
