//! HTML → clause text. Pure functions over the fetched body.

use scraper::{ElementRef, Html, Selector};

use super::FetchError;

/// Marker class for clause bodies on the reference site.
pub const REFERENCE_CLAUSE_SELECTOR: &str = ".clause-body";
pub const MAX_REFERENCE_CLAUSES: usize = 5;
pub const MAX_PAGE_PARAGRAPHS: usize = 10;

/// Text of the first five `.clause-body` elements, in document order.
pub fn reference_clauses(html: &str) -> Result<Vec<String>, FetchError> {
    let selector = parse_selector(REFERENCE_CLAUSE_SELECTOR)?;
    let document = Html::parse_document(html);
    Ok(document
        .select(&selector)
        .take(MAX_REFERENCE_CLAUSES)
        .map(element_text)
        .collect())
}

/// Text of the first ten `<p>` elements, joined by `\n`.
pub fn page_paragraphs(html: &str) -> Result<String, FetchError> {
    let selector = parse_selector("p")?;
    let document = Html::parse_document(html);
    Ok(document
        .select(&selector)
        .take(MAX_PAGE_PARAGRAPHS)
        .map(element_text)
        .collect::<Vec<_>>()
        .join("\n"))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn parse_selector(css: &str) -> Result<Selector, FetchError> {
    Selector::parse(css).map_err(|e| FetchError::Selector {
        selector: css.to_string(),
        reason: format!("{e:?}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_clauses_takes_first_five_trimmed() {
        let items: String = (1..=7)
            .map(|i| format!("<div class=\"clause-body\">\n  Clause {i}  \n</div>"))
            .collect();
        let html = format!("<html><body>{items}</body></html>");

        let clauses = reference_clauses(&html).unwrap();
        assert_eq!(
            clauses,
            vec!["Clause 1", "Clause 2", "Clause 3", "Clause 4", "Clause 5"]
        );
    }

    #[test]
    fn test_reference_clauses_includes_nested_markup() {
        let html = r#"<div class="clause-body">Supplier shall <b>deliver</b> the Services.</div>"#;
        assert_eq!(
            reference_clauses(html).unwrap(),
            vec!["Supplier shall deliver the Services."]
        );
    }

    #[test]
    fn test_reference_clauses_no_match_is_empty() {
        let html = "<html><body><p>Access denied</p></body></html>";
        assert!(reference_clauses(html).unwrap().is_empty());
    }

    #[test]
    fn test_page_paragraphs_takes_first_ten() {
        let items: String = (1..=12).map(|i| format!("<p> P{i} </p>")).collect();
        let html = format!("<html><body>{items}</body></html>");

        let text = page_paragraphs(&html).unwrap();
        assert_eq!(text, "P1\nP2\nP3\nP4\nP5\nP6\nP7\nP8\nP9\nP10");
    }

    #[test]
    fn test_page_paragraphs_ignores_non_paragraph_text() {
        let html = "<html><body><h1>Title</h1><p>Body</p><div>Footer</div></body></html>";
        assert_eq!(page_paragraphs(html).unwrap(), "Body");
    }

    #[test]
    fn test_page_paragraphs_without_paragraphs_is_empty() {
        assert_eq!(page_paragraphs("<html></html>").unwrap(), "");
    }
}
