// Core figure types for the plotting context

use serde::{Deserialize, Serialize};

/// How a series is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesKind {
    /// Connected line segments
    Line,
    /// Unconnected point markers
    Scatter,
    /// Columns rising from the zero baseline
    Bar,
}

/// One data series on a figure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub kind: SeriesKind,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl Series {
    /// Build a series, checking both axes have the same length.
    pub fn new(kind: SeriesKind, xs: Vec<f64>, ys: Vec<f64>) -> Result<Self, String> {
        if xs.len() != ys.len() {
            return Err(format!(
                "x and y must have same first dimension, but have shapes ({},) and ({},)",
                xs.len(),
                ys.len()
            ));
        }
        Ok(Self { kind, xs, ys })
    }

    /// Series whose x values are the indices 0..n
    pub fn indexed(kind: SeriesKind, ys: Vec<f64>) -> Self {
        let xs = (0..ys.len()).map(|i| i as f64).collect();
        Self { kind, xs, ys }
    }

    pub fn len(&self) -> usize {
        self.ys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ys.is_empty()
    }
}

/// An in-memory plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    /// 1-based figure number, unique within one attempt
    pub number: i64,
    pub title: Option<String>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub series: Vec<Series>,
}

impl Figure {
    pub fn new(number: i64) -> Self {
        Self {
            number,
            title: None,
            xlabel: None,
            ylabel: None,
            series: Vec::new(),
        }
    }

    /// Data bounds across every series as `(x_min, x_max, y_min, y_max)`.
    ///
    /// Bars always include the zero baseline. Degenerate ranges are widened
    /// so a single point still has an area to land in.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        let mut has_bars = false;

        for series in &self.series {
            for (&x, &y) in series.xs.iter().zip(&series.ys) {
                if !x.is_finite() || !y.is_finite() {
                    continue;
                }
                x_min = x_min.min(x);
                x_max = x_max.max(x);
                y_min = y_min.min(y);
                y_max = y_max.max(y);
            }
            has_bars |= series.kind == SeriesKind::Bar && !series.is_empty();
        }

        if !x_min.is_finite() || !y_min.is_finite() {
            return None;
        }
        if has_bars {
            y_min = y_min.min(0.0);
            y_max = y_max.max(0.0);
            // room for half a column on either side
            x_min -= 0.5;
            x_max += 0.5;
        }
        if x_max - x_min < f64::EPSILON {
            x_min -= 1.0;
            x_max += 1.0;
        }
        if y_max - y_min < f64::EPSILON {
            y_min -= 1.0;
            y_max += 1.0;
        }
        Some((x_min, x_max, y_min, y_max))
    }
}

/// Every figure created during the current attempt, plus the current one.
#[derive(Debug, Clone, Default)]
pub struct FigureSet {
    figures: Vec<Figure>,
    current: Option<usize>,
    next_number: i64,
}

impl FigureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new figure and make it current. Returns its number.
    pub fn new_figure(&mut self) -> i64 {
        self.next_number += 1;
        self.figures.push(Figure::new(self.next_number));
        self.current = Some(self.figures.len() - 1);
        self.next_number
    }

    /// The current figure, creating one first when none exists.
    pub fn current_mut(&mut self) -> &mut Figure {
        let idx = match self.current {
            Some(idx) => idx,
            None => {
                self.new_figure();
                self.figures.len() - 1
            }
        };
        &mut self.figures[idx]
    }

    /// The most recently active figure.
    pub fn current(&self) -> Option<&Figure> {
        self.current.and_then(|idx| self.figures.get(idx))
    }

    /// Close the current figure; the last remaining one becomes current.
    pub fn close_current(&mut self) {
        if let Some(idx) = self.current.take() {
            self.figures.remove(idx);
        }
        if !self.figures.is_empty() {
            self.current = Some(self.figures.len() - 1);
        }
    }

    /// Drop every figure and reset numbering.
    pub fn clear(&mut self) {
        self.figures.clear();
        self.current = None;
        self.next_number = 0;
    }

    pub fn len(&self) -> usize {
        self.figures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_mut_creates_implicit_figure() {
        let mut set = FigureSet::new();
        assert!(set.is_empty());
        set.current_mut().title = Some("auto".to_string());
        assert_eq!(set.len(), 1);
        assert_eq!(set.current().unwrap().number, 1);
    }

    #[test]
    fn test_new_figure_numbers_and_current() {
        let mut set = FigureSet::new();
        assert_eq!(set.new_figure(), 1);
        assert_eq!(set.new_figure(), 2);
        assert_eq!(set.current().unwrap().number, 2);

        set.close_current();
        assert_eq!(set.len(), 1);
        assert_eq!(set.current().unwrap().number, 1);

        set.close_current();
        assert!(set.is_empty());
        assert!(set.current().is_none());
    }

    #[test]
    fn test_clear_resets_numbering() {
        let mut set = FigureSet::new();
        set.new_figure();
        set.new_figure();
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.new_figure(), 1);
    }

    #[test]
    fn test_series_length_mismatch() {
        let err = Series::new(SeriesKind::Line, vec![1.0, 2.0, 3.0], vec![1.0]).unwrap_err();
        assert!(err.contains("(3,) and (1,)"));
    }

    #[test]
    fn test_bounds_widen_single_point() {
        let mut fig = Figure::new(1);
        fig.series.push(Series::indexed(SeriesKind::Scatter, vec![5.0]));
        assert_eq!(fig.bounds(), Some((-1.0, 1.0, 4.0, 6.0)));
    }

    #[test]
    fn test_bounds_bars_include_zero() {
        let mut fig = Figure::new(1);
        fig.series.push(Series::indexed(SeriesKind::Bar, vec![2.0, 4.0]));
        let (x_min, x_max, y_min, y_max) = fig.bounds().unwrap();
        assert_eq!((x_min, x_max), (-0.5, 1.5));
        assert_eq!((y_min, y_max), (0.0, 4.0));
    }

    #[test]
    fn test_bounds_empty_figure() {
        assert_eq!(Figure::new(1).bounds(), None);
    }
}
