//! Chart generation and rendering for HTML reports.
//!
//! This module creates interactive ECharts visualizations for a report:
//! - **Category chart**: a pie of category totals, or income and expense bars
//!   per category for the overall view
//! - **Daily trend chart**: a line of daily totals, or daily income and
//!   expense bars with the balance as a line for the overall view
//! - **Period chart**: bars per week or month
//! - **Monthly chart**: income and expense areas over the last twelve months,
//!   overall view only
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AreaStyle, AxisLabel, AxisPointer, AxisPointerType, AxisType, Color, Emphasis,
        EmphasisFocus, ItemStyle, JsFunction, Tooltip, Trigger,
    },
    series::{Line, Pie, bar},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    aggregate::{CategoryTotal, CombinedReport, SingleMetricReport},
    analysis::{AnalysisView, Report},
    html::HeadElement,
};

/// Colors used for categories that have no color of their own.
pub const FALLBACK_PALETTE: [&str; 8] = [
    "#EF4444", "#3B82F6", "#8B5CF6", "#F59E0B", "#10B981", "#EC4899", "#06B6D4", "#6B7280",
];

const INCOME_COLOR: &str = "#10B981";
const EXPENSE_COLOR: &str = "#EF4444";
const BALANCE_COLOR: &str = "#3B82F6";

/// A report chart with its HTML container ID and ECharts configuration.
pub struct ReportChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Builds every chart for `report`.
pub fn report_charts(report: &Report) -> Vec<ReportChart> {
    match report {
        Report::SingleMetric { context, report } => single_metric_charts(context.view, report),
        Report::Combined { report, .. } => combined_charts(report),
    }
}

fn single_metric_charts(view: AnalysisView, report: &SingleMetricReport) -> Vec<ReportChart> {
    vec![
        ReportChart {
            id: "category-chart",
            options: category_pie_chart(view, &report.category_totals).to_string(),
        },
        ReportChart {
            id: "daily-trend-chart",
            options: daily_total_chart(view, report).to_string(),
        },
        ReportChart {
            id: "period-chart",
            options: period_total_chart(view, report).to_string(),
        },
    ]
}

fn combined_charts(report: &CombinedReport) -> Vec<ReportChart> {
    vec![
        ReportChart {
            id: "category-chart",
            options: category_balance_chart(report).to_string(),
        },
        ReportChart {
            id: "daily-trend-chart",
            options: daily_balance_chart(report).to_string(),
        },
        ReportChart {
            id: "period-chart",
            options: period_balance_chart(report).to_string(),
        },
        ReportChart {
            id: "monthly-chart",
            options: monthly_chart(report).to_string(),
        },
    ]
}

/// Renders the HTML containers for report charts.
///
/// # Arguments
/// * `charts` - The charts to render containers for
///
/// # Returns
/// Maud markup containing a grid of chart container divs.
pub fn charts_view(charts: &[ReportChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                        style="min-height: 380px;"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for report charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub fn charts_script(charts: &[ReportChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// The color to draw the category at `position` with.
///
/// Categories without a color take the fallback palette entry for their
/// position, wrapping around after the last entry.
pub fn category_color(color: &str, position: usize) -> &str {
    if color.trim().is_empty() {
        FALLBACK_PALETTE[position % FALLBACK_PALETTE.len()]
    } else {
        color
    }
}

fn metric_name(view: AnalysisView) -> &'static str {
    match view {
        AnalysisView::Income => "Income",
        AnalysisView::Expense | AnalysisView::Overall => "Expenses",
    }
}

fn metric_color(view: AnalysisView) -> &'static str {
    match view {
        AnalysisView::Income => INCOME_COLOR,
        AnalysisView::Expense | AnalysisView::Overall => EXPENSE_COLOR,
    }
}

fn category_pie_chart(view: AnalysisView, category_totals: &[CategoryTotal]) -> Chart {
    let colors = category_totals
        .iter()
        .enumerate()
        .map(|(position, category)| Color::from(category_color(&category.color, position)))
        .collect();

    let data: Vec<(f64, String)> = category_totals
        .iter()
        .map(|category| (category.total, category.name.clone()))
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text(format!("{} by category", metric_name(view)))
                .left(20)
                .top("1%"),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().bottom("1%"))
        .color(colors)
        .series(
            Pie::new()
                .name(metric_name(view))
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}

fn daily_total_chart(view: AnalysisView, report: &SingleMetricReport) -> Chart {
    let labels = report
        .day_points
        .iter()
        .map(|point| point.date.to_string())
        .collect();
    let values: Vec<f64> = report.day_points.iter().map(|point| point.total).collect();

    axis_chart(&format!("Daily {}", metric_name(view).to_lowercase()), labels).series(
        Line::new()
            .name(metric_name(view))
            .item_style(ItemStyle::new().color(metric_color(view)))
            .data(values),
    )
}

fn period_total_chart(view: AnalysisView, report: &SingleMetricReport) -> Chart {
    let labels = report
        .period_points
        .iter()
        .map(|point| point.period.to_string())
        .collect();
    let values: Vec<f64> = report
        .period_points
        .iter()
        .map(|point| point.total)
        .collect();

    axis_chart(&format!("{} per period", metric_name(view)), labels).series(
        bar::Bar::new()
            .name(metric_name(view))
            .item_style(ItemStyle::new().color(metric_color(view)))
            .data(values),
    )
}

fn category_balance_chart(report: &CombinedReport) -> Chart {
    let labels = report
        .category_balances
        .iter()
        .map(|category| category.name.clone())
        .collect();
    let income = report
        .category_balances
        .iter()
        .map(|category| category.income)
        .collect();
    let expense = report
        .category_balances
        .iter()
        .map(|category| category.expense)
        .collect();

    income_expense_bars(axis_chart("Income and expenses by category", labels), income, expense)
}

fn daily_balance_chart(report: &CombinedReport) -> Chart {
    let labels = report
        .day_points
        .iter()
        .map(|point| point.date.to_string())
        .collect();
    let income = report.day_points.iter().map(|point| point.income).collect();
    let expense = report.day_points.iter().map(|point| point.expense).collect();
    let balance: Vec<f64> = report.day_points.iter().map(|point| point.balance).collect();

    income_expense_bars(axis_chart("Daily balance", labels), income, expense).series(
        Line::new()
            .name("Balance")
            .item_style(ItemStyle::new().color(BALANCE_COLOR))
            .data(balance),
    )
}

fn period_balance_chart(report: &CombinedReport) -> Chart {
    let labels = report
        .period_points
        .iter()
        .map(|point| point.period.to_string())
        .collect();
    let income = report
        .period_points
        .iter()
        .map(|point| point.income)
        .collect();
    let expense = report
        .period_points
        .iter()
        .map(|point| point.expense)
        .collect();

    income_expense_bars(axis_chart("Income and expenses per period", labels), income, expense)
}

fn monthly_chart(report: &CombinedReport) -> Chart {
    let labels = report
        .monthly_points
        .iter()
        .map(|point| point.month.to_string())
        .collect();
    let income: Vec<f64> = report
        .monthly_points
        .iter()
        .map(|point| point.income)
        .collect();
    let expense: Vec<f64> = report
        .monthly_points
        .iter()
        .map(|point| point.expense)
        .collect();

    axis_chart("Monthly income and expenses", labels)
        .series(
            Line::new()
                .name("Income")
                .item_style(ItemStyle::new().color(INCOME_COLOR))
                .area_style(AreaStyle::new())
                .data(income),
        )
        .series(
            Line::new()
                .name("Expenses")
                .item_style(ItemStyle::new().color(EXPENSE_COLOR))
                .area_style(AreaStyle::new())
                .data(expense),
        )
}

/// A chart with a category x axis of `labels` and a currency y axis.
fn axis_chart(title: &str, labels: Vec<String>) -> Chart {
    Chart::new()
        .title(Title::new().text(title).left(20).top("1%"))
        .tooltip(currency_tooltip())
        .legend(Legend::new().right(20).top("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(60)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
}

fn income_expense_bars(chart: Chart, income: Vec<f64>, expense: Vec<f64>) -> Chart {
    chart
        .series(
            bar::Bar::new()
                .name("Income")
                .item_style(ItemStyle::new().color(INCOME_COLOR))
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(income),
        )
        .series(
            bar::Bar::new()
                .name("Expenses")
                .item_style(ItemStyle::new().color(EXPENSE_COLOR))
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(expense),
        )
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('ja-JP', {
              style: 'currency',
              currency: 'JPY'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::{FALLBACK_PALETTE, category_color, category_pie_chart, report_charts};
    use crate::{
        aggregate::CategoryTotal,
        analysis::{AnalysisView, analyze},
        models::{Category, Transaction, TransactionKind},
        window::TimeRange,
    };

    fn create_test_transaction(id: &str, amount: f64, kind: TransactionKind) -> Transaction {
        Transaction::build(amount, kind, date!(2024 - 06 - 01))
            .id(id)
            .category_id(Some("food"))
            .finalise()
            .unwrap()
    }

    #[test]
    fn empty_colors_take_palette_by_position() {
        assert_eq!(category_color("#123456", 0), "#123456");
        assert_eq!(category_color("", 1), FALLBACK_PALETTE[1]);
        assert_eq!(category_color("  ", 9), FALLBACK_PALETTE[1]);
    }

    #[test]
    fn pie_chart_uses_category_names_and_colors() {
        let totals = vec![
            CategoryTotal {
                category_id: "food".to_owned(),
                name: "食費".to_owned(),
                color: "#EF4444".to_owned(),
                total: 1500.0,
                percentage: Some(60.0),
            },
            CategoryTotal {
                category_id: "misc".to_owned(),
                name: "Misc".to_owned(),
                color: String::new(),
                total: 1000.0,
                percentage: Some(40.0),
            },
        ];

        let options = category_pie_chart(AnalysisView::Expense, &totals).to_string();

        assert!(options.contains("食費"));
        assert!(options.contains("#EF4444"));
        assert!(options.contains(FALLBACK_PALETTE[1]));
        assert!(options.contains("\"pie\""));
    }

    #[test]
    fn overall_view_has_monthly_chart() {
        let transactions = vec![
            create_test_transaction("1", 1000.0, TransactionKind::Expense),
            create_test_transaction("2", 3000.0, TransactionKind::Income),
        ];
        let categories = vec![Category::new("food", "食費", "#EF4444")];
        let report = analyze(
            AnalysisView::Overall,
            &transactions,
            &categories,
            TimeRange::Month,
            date!(2024 - 06 - 10),
        )
        .unwrap();

        let charts = report_charts(&report);

        let ids: Vec<&str> = charts.iter().map(|chart| chart.id).collect();
        assert_eq!(
            ids,
            vec![
                "category-chart",
                "daily-trend-chart",
                "period-chart",
                "monthly-chart"
            ]
        );
        assert!(charts[3].options.contains("2023-07"));
    }

    #[test]
    fn single_metric_view_has_no_monthly_chart() {
        let transactions = vec![create_test_transaction("1", 1000.0, TransactionKind::Expense)];
        let report = analyze(
            AnalysisView::Expense,
            &transactions,
            &[],
            TimeRange::Week,
            date!(2024 - 06 - 03),
        )
        .unwrap();

        let charts = report_charts(&report);

        assert_eq!(charts.len(), 3);
        assert!(charts[1].options.contains("2024-06-01"));
    }
}
