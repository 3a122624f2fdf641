//! The standalone HTML report page.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::{
    aggregate::CategoryTotal,
    analysis::{Report, ReportContext},
    charts::{category_color, charts_script, charts_view, report_charts},
    currency::{format_currency, format_percentage},
};

const ECHARTS_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";
const TAILWIND_URL: &str = "https://cdn.tailwindcss.com";

// Page container
const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center px-6 py-8 mx-auto lg:py-5 text-gray-900 dark:text-white";

// Table styles
const TABLE_HEADER_STYLE: &str = "text-xs text-gray-700 uppercase \
    bg-gray-50 dark:bg-gray-700 dark:text-gray-400";

const TABLE_ROW_STYLE: &str = "bg-white border-b dark:bg-gray-800 dark:border-gray-700";

const TABLE_CELL_STYLE: &str = "px-6 py-4";

const CARD_STYLE: &str = "p-4 bg-white rounded shadow dark:bg-gray-800";

/// Extra elements to place in the page head.
pub enum HeadElement {
    /// The file path or URL to a JavaScript script.
    ScriptLink(String),
    /// JavaScript source code.
    ScriptSource(PreEscaped<String>),
}

/// Wraps `content` in a complete HTML document.
pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="ja"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Kakeibo" }

                script src=(TAILWIND_URL) {}

                @for element in head_elements
                {
                    @match element
                    {
                        HeadElement::ScriptSource(text) => script { (text) }
                        HeadElement::ScriptLink(path) => script src=(path) {}
                    }
                }
            }

            body class="container max-w-full min-h-screen bg-gray-50 dark:bg-gray-900"
            {
                (content)
            }
        }
    }
}

/// Renders `report` as a complete HTML document with interactive charts.
pub fn render_report_html(report: &Report) -> String {
    let context = report.context();
    let charts = report_charts(report);

    let content = html! {
        main class=(PAGE_CONTAINER_STYLE)
        {
            (header_view(context))
            (summary_view(report))
            (charts_view(&charts))
            (category_table_view(report))
        }
    };

    let head_elements = [
        HeadElement::ScriptLink(ECHARTS_URL.to_owned()),
        charts_script(&charts),
    ];

    base(context.view.title(), &head_elements, &content).into_string()
}

fn header_view(context: &ReportContext) -> Markup {
    html! {
        header class="w-full mb-4"
        {
            h1 class="text-2xl font-bold" { (context.view.title()) }
            p class="text-sm text-gray-500 dark:text-gray-400"
            {
                (context.range.label()) ": " (context.window_start) " to " (context.now)
            }
        }
    }
}

fn summary_card(label: &str, value: &str) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            dt class="text-sm text-gray-500 dark:text-gray-400" { (label) }
            dd class="text-xl font-semibold" { (value) }
        }
    }
}

fn summary_view(report: &Report) -> Markup {
    html! {
        dl id="summary" class="w-full grid grid-cols-2 lg:grid-cols-4 gap-4 mb-4"
        {
            @match report {
                Report::SingleMetric { report, .. } => {
                    (summary_card("Total", &format_currency(report.summary.total)))
                    (summary_card("Average per period", &format_currency(report.summary.average)))
                    (summary_card("Transactions", &report.summary.count.to_string()))
                }
                Report::Combined { report, .. } => {
                    (summary_card("Income", &format_currency(report.summary.total_income)))
                    (summary_card("Expenses", &format_currency(report.summary.total_expense)))
                    (summary_card("Balance", &format_currency(report.summary.balance)))
                    (summary_card("Transactions", &report.summary.transaction_count.to_string()))
                }
            }
        }
    }
}

fn color_swatch(color: &str, position: usize) -> Markup {
    html! {
        span
            class="inline-block w-3 h-3 mr-2 rounded-full"
            style=(format!("background-color: {};", category_color(color, position)))
        {}
    }
}

/// Category totals largest first, paired with their position in the report
/// so fallback colors match the category chart.
fn largest_first(category_totals: &[CategoryTotal]) -> Vec<(usize, &CategoryTotal)> {
    let mut sorted: Vec<_> = category_totals.iter().enumerate().collect();
    sorted.sort_by(|(_, a), (_, b)| b.total.total_cmp(&a.total));
    sorted
}

fn category_table_view(report: &Report) -> Markup {
    html! {
        section id="categories" class="w-full overflow-x-auto"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                @match report {
                    Report::SingleMetric { report, .. } => {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Total" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Share" }
                            }
                        }
                        tbody
                        {
                            @for (position, category) in largest_first(&report.category_totals) {
                                tr class=(TABLE_ROW_STYLE)
                                {
                                    td class=(TABLE_CELL_STYLE)
                                    {
                                        (color_swatch(&category.color, position))
                                        (category.name)
                                    }
                                    td class=(TABLE_CELL_STYLE) { (format_currency(category.total)) }
                                    td class=(TABLE_CELL_STYLE) { (format_percentage(category.percentage)) }
                                }
                            }
                        }
                    }
                    Report::Combined { report, .. } => {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Income" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Expenses" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Balance" }
                            }
                        }
                        tbody
                        {
                            @for (position, category) in report.category_balances.iter().enumerate() {
                                tr class=(TABLE_ROW_STYLE)
                                {
                                    td class=(TABLE_CELL_STYLE)
                                    {
                                        (color_swatch(&category.color, position))
                                        (category.name)
                                    }
                                    td class=(TABLE_CELL_STYLE) { (format_currency(category.income)) }
                                    td class=(TABLE_CELL_STYLE) { (format_currency(category.expense)) }
                                    td class=(TABLE_CELL_STYLE) { (format_currency(category.balance)) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use super::render_report_html;
    use crate::{
        analysis::{AnalysisView, analyze},
        models::{Category, Transaction, TransactionKind},
        window::TimeRange,
    };

    fn create_test_transaction(
        id: &str,
        amount: f64,
        kind: TransactionKind,
        category_id: &str,
    ) -> Transaction {
        Transaction::build(amount, kind, date!(2024 - 06 - 01))
            .id(id)
            .category_id(Some(category_id))
            .finalise()
            .unwrap()
    }

    fn render(view: AnalysisView) -> Html {
        let transactions = vec![
            create_test_transaction("1", 1000.0, TransactionKind::Expense, "food"),
            create_test_transaction("2", 4000.0, TransactionKind::Expense, "housing"),
            create_test_transaction("3", 2000.0, TransactionKind::Income, "salary"),
        ];
        let categories = vec![
            Category::new("food", "食費", "#EF4444"),
            Category::new("housing", "住居費", ""),
            Category::new("salary", "給与", "#10B981"),
        ];
        let report = analyze(
            view,
            &transactions,
            &categories,
            TimeRange::Month,
            date!(2024 - 06 - 15),
        )
        .unwrap();

        Html::parse_document(&render_report_html(&report))
    }

    #[track_caller]
    fn assert_valid_html(html: &Html) {
        assert!(
            html.errors.is_empty(),
            "Got HTML parsing errors: {:?}",
            html.errors
        );
    }

    #[test]
    fn expense_page_has_title_and_chart_containers() {
        let html = render(AnalysisView::Expense);
        assert_valid_html(&html);

        let title = Selector::parse("title").unwrap();
        let title = html.select(&title).next().unwrap().text().collect::<String>();
        assert_eq!(title, "Expense analysis - Kakeibo");

        let containers = Selector::parse("#charts div[id]").unwrap();
        let ids: Vec<_> = html
            .select(&containers)
            .filter_map(|element| element.value().attr("id"))
            .collect();
        assert_eq!(ids, vec!["category-chart", "daily-trend-chart", "period-chart"]);
    }

    #[test]
    fn expense_page_lists_categories_largest_first() {
        let html = render(AnalysisView::Expense);

        let rows = Selector::parse("#categories tbody tr").unwrap();
        let rows: Vec<String> = html
            .select(&rows)
            .map(|row| row.text().collect::<String>())
            .collect();

        assert_eq!(rows.len(), 2);
        assert!(rows[0].contains("住居費"));
        assert!(rows[0].contains("¥4,000"));
        assert!(rows[0].contains("80.0%"));
        assert!(rows[1].contains("食費"));
    }

    #[test]
    fn overall_page_summarises_balance() {
        let html = render(AnalysisView::Overall);
        assert_valid_html(&html);

        let summary = Selector::parse("#summary dd").unwrap();
        let values: Vec<String> = html
            .select(&summary)
            .map(|value| value.text().collect::<String>())
            .collect();

        assert_eq!(values, vec!["¥2,000", "¥5,000", "-¥3,000", "3"]);

        let monthly = Selector::parse("#monthly-chart").unwrap();
        assert!(html.select(&monthly).next().is_some());
    }
}
