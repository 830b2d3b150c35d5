//! Line chart of proportion trajectories, drawn in a piston window.

use piston_window::*;
use tracing::{info, warn};

use crate::config::ChartSettings;
use crate::error::{Error, Result};
use crate::simulation::Trajectory;
use crate::sweep::SweepRun;

const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 60.0;
const LINE_RADIUS: f64 = 1.0;
const FONT_PATH: &str = "assets/FiraSans-Regular.ttf";

const BACKGROUND: [f32; 4] = [0.1, 0.1, 0.1, 1.0];
const PLOT_BACKGROUND: [f32; 4] = [0.15, 0.15, 0.15, 1.0];
const AXIS_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 1.0];
const GRID_COLOR: [f32; 4] = [0.3, 0.3, 0.3, 1.0];
const TEXT_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const HAWK_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
const DOVE_COLOR: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
const SWEEP_PALETTE: [[f32; 4]; 6] = [
    [1.0, 0.0, 0.0, 1.0],
    [1.0, 0.5, 0.0, 1.0],
    [1.0, 1.0, 0.0, 1.0],
    [0.0, 1.0, 0.0, 1.0],
    [0.0, 0.6, 1.0, 1.0],
    [0.7, 0.3, 1.0, 1.0],
];

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub values: Vec<f64>,
    pub color: [f32; 4],
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub generations: Vec<f64>,
    pub series: Vec<Series>,
}

impl Chart {
    pub fn hawk_dove(trajectory: &Trajectory, settings: &ChartSettings) -> Self {
        Chart {
            title: settings.title.clone(),
            x_label: settings.x_label.clone(),
            y_label: settings.y_label.clone(),
            generations: trajectory.generations(),
            series: vec![
                Series {
                    label: "Hawk".to_string(),
                    values: trajectory.hawk.clone(),
                    color: HAWK_COLOR,
                },
                Series {
                    label: "Dove".to_string(),
                    values: trajectory.dove.clone(),
                    color: DOVE_COLOR,
                },
            ],
        }
    }

    /// One hawk series per run, labeled with its starting proportion.
    pub fn sweep(runs: &[SweepRun], settings: &ChartSettings) -> Self {
        let generations = runs
            .first()
            .map(|run| run.trajectory.generations())
            .unwrap_or_default();
        let series = runs
            .iter()
            .enumerate()
            .map(|(i, run)| Series {
                label: format!("Hawk (h0={:.2})", run.initial_hawk_proportion),
                values: run.trajectory.hawk.clone(),
                color: SWEEP_PALETTE[i % SWEEP_PALETTE.len()],
            })
            .collect();
        Chart {
            title: settings.title.clone(),
            x_label: settings.x_label.clone(),
            y_label: settings.y_label.clone(),
            generations,
            series,
        }
    }

    pub fn x_range(&self) -> (f64, f64) {
        let last = self.generations.last().copied().unwrap_or(0.0);
        (0.0, last.max(1.0))
    }

    /// Always spans `[0, 1]`, widened if a series leaves it.
    pub fn y_range(&self) -> (f64, f64) {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .fold((0.0_f64, 1.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)))
    }

    pub fn polyline(&self, series: &Series, area: &PlotArea) -> Vec<[f64; 2]> {
        let (x_range, y_range) = (self.x_range(), self.y_range());
        self.generations
            .iter()
            .zip(&series.values)
            .map(|(&x, &y)| area.to_screen(x, y, x_range, y_range))
            .collect()
    }
}

/// Plot rectangle inside the window, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn for_window(width: f64, height: f64) -> Self {
        PlotArea {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            width: (width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
            height: (height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Maps data coordinates to screen pixels; screen y grows downwards.
    pub fn to_screen(&self, x: f64, y: f64, x_range: (f64, f64), y_range: (f64, f64)) -> [f64; 2] {
        let fx = (x - x_range.0) / (x_range.1 - x_range.0);
        let fy = (y - y_range.0) / (y_range.1 - y_range.0);
        [self.left + fx * self.width, self.bottom() - fy * self.height]
    }
}

/// Opens the chart window and blocks until it is closed.
pub fn show(chart: &Chart, settings: &ChartSettings) -> Result<()> {
    let mut window: PistonWindow =
        WindowSettings::new(chart.title.as_str(), [settings.width, settings.height])
            .exit_on_esc(true)
            .build()
            .map_err(|e| Error::Render(e.to_string()))?;

    let mut glyphs = {
        let font_path = std::path::Path::new(FONT_PATH);
        if font_path.exists() {
            window.load_font(font_path).ok()
        } else {
            warn!(path = ?font_path, "font not found, drawing chart without text");
            None
        }
    };

    info!(series = chart.series.len(), points = chart.generations.len(), "opening chart window");

    while let Some(e) = window.next() {
        let size = window.size();
        let area = PlotArea::for_window(size.width, size.height);

        window.draw_2d(&e, |c, g, device| {
            clear(BACKGROUND, g);
            rectangle(
                PLOT_BACKGROUND,
                [area.left, area.top, area.width, area.height],
                c.transform,
                g,
            );
            draw_grid(chart, &area, c.transform, g);

            for series in &chart.series {
                let points = chart.polyline(series, &area);
                for pair in points.windows(2) {
                    line_from_to(series.color, LINE_RADIUS, pair[0], pair[1], c.transform, g);
                }
            }

            draw_legend_swatches(chart, &area, c.transform, g);

            if let Some(ref mut glyphs) = glyphs {
                draw_labels(chart, &area, glyphs, &c, g);
                glyphs.factory.encoder.flush(device);
            }
        });
    }
    Ok(())
}

fn y_ticks(y_range: (f64, f64)) -> Vec<f64> {
    (0..=4)
        .map(|i| y_range.0 + (y_range.1 - y_range.0) * i as f64 / 4.0)
        .collect()
}

fn x_ticks(x_range: (f64, f64)) -> Vec<f64> {
    (0..=5)
        .map(|i| (x_range.0 + (x_range.1 - x_range.0) * i as f64 / 5.0).round())
        .collect()
}

fn draw_grid(chart: &Chart, area: &PlotArea, transform: math::Matrix2d, g: &mut G2d) {
    let (x_range, y_range) = (chart.x_range(), chart.y_range());

    for y in y_ticks(y_range) {
        let [_, sy] = area.to_screen(x_range.0, y, x_range, y_range);
        line_from_to(GRID_COLOR, 0.5, [area.left, sy], [area.right(), sy], transform, g);
    }
    for x in x_ticks(x_range) {
        let [sx, _] = area.to_screen(x, y_range.0, x_range, y_range);
        line_from_to(GRID_COLOR, 0.5, [sx, area.top], [sx, area.bottom()], transform, g);
    }

    line_from_to(AXIS_COLOR, 1.0, [area.left, area.bottom()], [area.right(), area.bottom()], transform, g);
    line_from_to(AXIS_COLOR, 1.0, [area.left, area.top], [area.left, area.bottom()], transform, g);
}

fn legend_origin(area: &PlotArea, index: usize) -> [f64; 2] {
    [area.right() - 150.0, area.top + 10.0 + index as f64 * 20.0]
}

fn draw_legend_swatches(chart: &Chart, area: &PlotArea, transform: math::Matrix2d, g: &mut G2d) {
    for (i, series) in chart.series.iter().enumerate() {
        let [x, y] = legend_origin(area, i);
        rectangle(series.color, [x, y, 12.0, 12.0], transform, g);
    }
}

fn draw_labels(chart: &Chart, area: &PlotArea, glyphs: &mut Glyphs, c: &Context, g: &mut G2d) {
    let (x_range, y_range) = (chart.x_range(), chart.y_range());
    let small = text::Text::new_color(TEXT_COLOR, 12);
    let large = text::Text::new_color(TEXT_COLOR, 20);

    let mut put = |style: &text::Text, s: &str, x: f64, y: f64| {
        let drawn = style.draw(s, &mut *glyphs, &c.draw_state, c.transform.trans(x, y), &mut *g);
        if drawn.is_err() {
            warn!(text = s, "failed to draw text");
        }
    };

    put(&large, &chart.title, area.left, area.top - 30.0);
    put(&small, &chart.y_label, 10.0, area.top - 8.0);
    put(&small, &chart.x_label, area.left + area.width / 2.0 - 40.0, area.bottom() + 45.0);

    for y in y_ticks(y_range) {
        let [_, sy] = area.to_screen(x_range.0, y, x_range, y_range);
        put(&small, &format!("{y:.2}"), area.left - 40.0, sy + 4.0);
    }
    for x in x_ticks(x_range) {
        let [sx, _] = area.to_screen(x, y_range.0, x_range, y_range);
        put(&small, &format!("{x:.0}"), sx - 8.0, area.bottom() + 20.0);
    }
    for (i, series) in chart.series.iter().enumerate() {
        let [x, y] = legend_origin(area, i);
        put(&small, &series.label, x + 18.0, y + 11.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{SimulationConfig, simulate};
    use crate::sweep;

    #[test]
    fn hawk_dove_chart_carries_labels_and_indices() {
        let trajectory = simulate(&SimulationConfig::default()).unwrap();
        let chart = Chart::hawk_dove(&trajectory, &ChartSettings::default());

        assert_eq!(chart.title, "Evolution of Hawk-Dove Game");
        assert_eq!(chart.x_label, "Generations");
        assert_eq!(chart.y_label, "Proportion of Population");
        assert_eq!(chart.generations.len(), 100);
        assert_eq!(chart.generations[0], 0.0);
        assert_eq!(chart.generations[99], 99.0);

        let labels: Vec<&str> = chart.series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["Hawk", "Dove"]);
        assert_eq!(chart.series[0].values, trajectory.hawk);
        assert_eq!(chart.series[1].values, trajectory.dove);
    }

    #[test]
    fn sweep_chart_has_one_series_per_run() {
        let runs = sweep::run(&SimulationConfig::default(), &sweep::even_initials(3)).unwrap();
        let chart = Chart::sweep(&runs, &ChartSettings::default());

        assert_eq!(chart.series.len(), 3);
        assert_eq!(chart.series[1].label, "Hawk (h0=0.50)");
        assert_eq!(chart.generations.len(), 100);
    }

    #[test]
    fn plot_area_maps_corners() {
        let area = PlotArea::for_window(800.0, 600.0);
        assert_eq!(area.to_screen(0.0, 0.0, (0.0, 99.0), (0.0, 1.0)), [area.left, area.bottom()]);
        assert_eq!(area.to_screen(99.0, 1.0, (0.0, 99.0), (0.0, 1.0)), [area.right(), area.top]);
    }

    #[test]
    fn ranges_cover_unit_interval_and_all_generations() {
        let trajectory = Trajectory {
            hawk: vec![0.2, 0.4, 0.6],
            dove: vec![0.8, 0.6, 0.4],
        };
        let chart = Chart::hawk_dove(&trajectory, &ChartSettings::default());
        assert_eq!(chart.y_range(), (0.0, 1.0));
        assert_eq!(chart.x_range(), (0.0, 2.0));

        let area = PlotArea::for_window(400.0, 300.0);
        let points = chart.polyline(&chart.series[0], &area);
        assert_eq!(points.len(), 3);
        assert!(points.windows(2).all(|p| p[1][0] > p[0][0] && p[1][1] < p[0][1]));
    }

    #[test]
    fn single_generation_chart_has_nonzero_width() {
        let trajectory = Trajectory {
            hawk: vec![0.5],
            dove: vec![0.5],
        };
        let chart = Chart::hawk_dove(&trajectory, &ChartSettings::default());
        assert_eq!(chart.x_range(), (0.0, 1.0));
    }
}
