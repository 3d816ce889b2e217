//! Google Finance

use search_adapter::render::{items, text, Markdown};
use search_adapter::{Engine, EngineSchema, FieldKind, FieldSpec, UnknownFields};
use serde_json::Value;


const WINDOWS: &[&str] = &["1D", "5D", "1M", "6M", "YTD", "1Y", "5Y", "MAX"];

static FIELDS: &[FieldSpec] = &[
    FieldSpec::new("query", "q", FieldKind::Text).required(),
    FieldSpec::text("hl"),
    FieldSpec::new("window", "window", FieldKind::Choice(WINDOWS)),
];

pub static GOOGLE_FINANCE: Engine = Engine {
    schema: EngineSchema {
        tool: "google_finance_search",
        engine: Some("google_finance"),
        endpoint: "/search",
        fields: FIELDS,
        constraints: &[],
        unknown: UnknownFields::Drop,
    },
    render: render_finance,
};

/// `📈 +1.20 (0.8%)`
fn movement(value: Option<&Value>) -> Option<String> {
    let movement = value.filter(|v| v.is_object())?;
    let direction = match text(movement, "movement").as_deref() {
        Some("Up") => "📈",
        _ => "📉",
    };
    Some(format!(
        "{} {} ({}%)",
        direction,
        text(movement, "value").unwrap_or_default(),
        text(movement, "percentage").unwrap_or_default()
    ))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn render_finance(doc: &Value) -> String {
    let mut md = Markdown::new();

    let summary = doc
        .get("summary")
        .or_else(|| doc.get("stock_info"))
        .filter(|v| v.is_object());
    if let Some(stock) = summary {
        let title = text(stock, "title").unwrap_or_else(|| "Stock Information".to_string());
        md.heading(1, title);
        md.gap();
        md.strong_field("Current Price", text(stock, "price"));
        md.strong_field("Change", movement(stock.get("price_movement")));
        md.strong_field("Exchange", text(stock, "exchange"));
        md.strong_field("Currency", text(stock, "currency"));
    }

    if let Some(graph) = doc.get("graph").filter(|v| v.is_object()) {
        md.heading(1, "Graph Information");
        md.gap();
        md.strong_field("Time Window", text(graph, "time_window"));
        let buttons: Vec<String> = items(graph, "time_window_buttons")
            .iter()
            .filter_map(|b| b.as_str().map(str::to_string))
            .collect();
        if !buttons.is_empty() {
            md.strong_field("Available Time Windows", Some(buttons.join(", ")));
        }
    }

    if let Some(Value::Object(markets)) = doc.get("markets") {
        for (market, stocks) in markets {
            let Value::Array(stocks) = stocks else {
                continue;
            };
            md.heading(1, format!("{} Market", capitalize(market)));
            for stock in stocks {
                let name = text(stock, "name").or_else(|| text(stock, "stock"));
                md.heading(2, name.unwrap_or_else(|| "[No name]".to_string()));
                md.strong_field("Price", text(stock, "price"));
                md.strong_field("Change", movement(stock.get("price_movement")));
                md.strong_field("Link", text(stock, "link"));
            }
        }
    }

    let news = items(doc, "news_results");
    if !news.is_empty() {
        md.heading(1, format!("News ({})", news.len()));
        for (i, article) in news.iter().enumerate() {
            let title = text(article, "title").unwrap_or_else(|| "[No title available]".to_string());
            md.heading(2, format!("{}. {}", i + 1, title));
            md.strong_field("Date", text(article, "date"));
            md.strong_field("Source", text(article, "source"));
            if let Some(snippet) = text(article, "snippet") {
                md.gap().line(snippet);
            }
            if let Some(link) = text(article, "link") {
                md.gap().strong_field("Link", Some(link));
            }
        }
    }

    let also = items(doc, "people_also_search_for");
    if !also.is_empty() {
        md.heading(1, "People Also Search For");
        for item in also {
            if let Some(title) = text(item, "title").or_else(|| text(item, "name")) {
                md.bullet(title);
                md.detail("**Link:**", text(item, "link"));
            }
        }
    }

    md.finish()
}
