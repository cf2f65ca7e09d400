//! Text graphs: horizontal bar and scrolling sine trail

use std::collections::VecDeque;

/// Horizontal bar scaled into a fixed value range
#[derive(Debug, Clone)]
pub struct BarGraph {
    width: usize,
    min: f64,
    max: f64,
    label: String,
}

impl BarGraph {
    pub fn new(width: usize, range: (f64, f64), label: &str) -> Self {
        Self {
            width,
            min: range.0,
            max: range.1,
            label: label.to_string(),
        }
    }

    /// Number of `#` drawn for `value`
    pub fn bar_length(&self, value: f64) -> usize {
        let span = self.max - self.min;
        if span <= 0.0 || !value.is_finite() {
            return 0;
        }
        let normalized = (value.clamp(self.min, self.max) - self.min) / span;
        (normalized * self.width as f64) as usize
    }

    pub fn render(&self, value: f64) -> String {
        format!(
            "{}: {:5.2} | {}",
            self.label,
            value,
            "#".repeat(self.bar_length(value))
        )
    }
}

/// Scrolling plot of the most recent `width` values with an age-faded trail
#[derive(Debug, Clone)]
pub struct SineTrail {
    width: usize,
    height: usize,
    min: f64,
    max: f64,
    /// Oldest first; starts filled with zeros
    values: VecDeque<f64>,
    has_data: bool,
    labels: Vec<String>,
}

impl SineTrail {
    pub fn new(width: usize, height: usize, range: (f64, f64)) -> Self {
        let width = width.max(1);
        let height = height.max(2);
        let (min, max) = range;

        let labels = (0..height)
            .map(|i| {
                let value = max - i as f64 * (max - min) / (height - 1) as f64;
                if value.abs() < 0.01 {
                    " 0.0 |".to_string()
                } else {
                    format!("{:5.2}|", value)
                }
            })
            .collect();

        Self {
            width,
            height,
            min,
            max,
            values: std::iter::repeat(0.0).take(width).collect(),
            has_data: false,
            labels,
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn push(&mut self, value: f64) {
        self.values.pop_front();
        self.values.push_back(value);
        self.has_data = true;
    }

    pub fn current(&self) -> Option<f64> {
        if self.has_data {
            self.values.back().copied()
        } else {
            None
        }
    }

    /// Row index of `value`, 0 at the top
    pub fn row_of(&self, value: f64) -> usize {
        let span = self.max - self.min;
        let normalized = if span > 0.0 {
            (value.clamp(self.min, self.max) - self.min) / span
        } else {
            0.5
        };
        let row = ((1.0 - normalized) * (self.height - 1) as f64).round() as usize;
        row.min(self.height - 1)
    }

    fn trail_glyph(age: usize) -> char {
        match age {
            0 => '●',
            1..=4 => '•',
            5..=14 => '·',
            _ => '.',
        }
    }

    pub fn render(&self) -> Vec<String> {
        let mut rows: Vec<Vec<char>> = vec![vec![' '; self.width]; self.height];

        if self.has_data {
            let newest = self.values.len() - 1;
            for (column, &value) in self.values.iter().enumerate() {
                let row = self.row_of(value);
                rows[row][column] = Self::trail_glyph(newest - column);
            }
        }

        let current_row = self.current().map(|value| (self.row_of(value), value));

        rows.into_iter()
            .enumerate()
            .map(|(i, row)| {
                let mut line = self.labels[i].clone();
                line.extend(row);
                if let Some((r, value)) = current_row {
                    if r == i {
                        line.push_str(&format!(" ← Current: {:+.2}", value));
                    }
                }
                line
            })
            .collect()
    }
}
