use serde::Serialize;

use crate::models::RevenuePoint;

const LABEL_STEP: i64 = 1000;

/// Y axis of the revenue chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YAxis {
    /// Tick labels from the top of the axis down to zero
    pub labels: Vec<String>,
    /// Value at the top of the axis; bar heights scale against it
    pub top_label: i64,
}

/// Computes the Y axis for `revenue`, in steps of one thousand.
///
/// Returns `None` for an empty series, which has no maximum.
pub fn generate_y_axis(revenue: &[RevenuePoint]) -> Option<YAxis> {
    let highest = revenue.iter().map(|point| point.revenue).max()?;
    let top_label = ceil_to_step(highest);

    let labels = (0..=top_label)
        .rev()
        .step_by(LABEL_STEP as usize)
        .map(|value| format!("{} K €", value / LABEL_STEP))
        .collect();

    Some(YAxis { labels, top_label })
}

fn ceil_to_step(value: i64) -> i64 {
    if value % LABEL_STEP == 0 {
        value
    } else {
        value
            .div_euclid(LABEL_STEP)
            .saturating_add(1)
            .saturating_mul(LABEL_STEP)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub month: String,
    pub height: f64,
}

/// Data for the revenue bar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueChart {
    pub chart_height: f64,
    pub y_axis: YAxis,
    pub bars: Vec<Bar>,
}

impl RevenueChart {
    /// Lays out `revenue` on a chart `chart_height` pixels tall.
    ///
    /// Returns `None` when there is no data to show.
    pub fn build(revenue: &[RevenuePoint], chart_height: f64) -> Option<Self> {
        let y_axis = generate_y_axis(revenue)?;

        let bars = revenue
            .iter()
            .map(|point| Bar {
                month: point.month.clone(),
                height: bar_height(chart_height, y_axis.top_label, point.revenue),
            })
            .collect();

        Some(Self {
            chart_height,
            y_axis,
            bars,
        })
    }
}

fn bar_height(chart_height: f64, top_label: i64, value: i64) -> f64 {
    if top_label <= 0 {
        return 0.0;
    }
    (chart_height / top_label as f64) * value as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_rounds_up_to_next_thousand() {
        let axis = generate_y_axis(&[RevenuePoint::new("Jan", 4300)]).unwrap();

        assert_eq!(axis.top_label, 5000);
        assert_eq!(
            axis.labels,
            vec!["5 K €", "4 K €", "3 K €", "2 K €", "1 K €", "0 K €"]
        );
    }

    #[test]
    fn test_axis_uses_highest_month() {
        let revenue = vec![
            RevenuePoint::new("Jan", 2000),
            RevenuePoint::new("Feb", 1800),
            RevenuePoint::new("Mar", 2200),
        ];

        let axis = generate_y_axis(&revenue).unwrap();

        assert_eq!(axis.top_label, 3000);
        assert_eq!(axis.labels.len(), 4);
        assert_eq!(axis.labels[0], "3 K €");
    }

    #[test]
    fn test_exact_thousand_is_not_raised() {
        let axis = generate_y_axis(&[RevenuePoint::new("Jan", 4000)]).unwrap();
        assert_eq!(axis.top_label, 4000);
        assert_eq!(axis.labels.first().map(String::as_str), Some("4 K €"));
    }

    #[test]
    fn test_zero_revenue() {
        let axis = generate_y_axis(&[RevenuePoint::new("Jan", 0)]).unwrap();
        assert_eq!(axis.top_label, 0);
        assert_eq!(axis.labels, vec!["0 K €"]);
    }

    #[test]
    fn test_empty_series_has_no_axis() {
        assert_eq!(generate_y_axis(&[]), None);
        assert_eq!(RevenueChart::build(&[], 350.0), None);
    }

    #[test]
    fn test_bar_heights_scale_to_top_label() {
        let revenue = vec![RevenuePoint::new("Jan", 2500), RevenuePoint::new("Feb", 5000)];

        let chart = RevenueChart::build(&revenue, 350.0).unwrap();

        assert_eq!(chart.y_axis.top_label, 5000);
        assert_eq!(chart.bars[0].month, "Jan");
        assert!((chart.bars[0].height - 175.0).abs() < 1e-9);
        assert!((chart.bars[1].height - 350.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_zero_bars_are_flat() {
        let chart = RevenueChart::build(&[RevenuePoint::new("Jan", 0)], 350.0).unwrap();
        assert_eq!(chart.bars[0].height, 0.0);
    }
}
