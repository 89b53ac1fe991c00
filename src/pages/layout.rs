use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use super::seo::{PageMeta, SITE_NAME};

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:0;color:#1f2937;background:#f9fafb}\
header,footer{background:#b91c1c;color:#fff;padding:1rem}\
header a,footer a{color:#fff;margin-right:1rem}\
main{max-width:72rem;margin:0 auto;padding:2rem 1rem}\
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(14rem,1fr));gap:1rem;list-style:none;padding:0}\
.card{background:#fff;border-radius:.5rem;box-shadow:0 1px 3px #0002;padding:1rem}\
.breadcrumbs{font-size:.9rem;margin-bottom:1rem}\
.pagination{display:flex;gap:.5rem;list-style:none;padding:0;justify-content:center}";

/// One step of the breadcrumb trail; the last one is rendered without a link.
#[derive(Debug, Clone)]
pub struct Crumb {
    pub label: String,
    pub href: String,
}

impl Crumb {
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
        }
    }
}

fn breadcrumbs(crumbs: &[Crumb]) -> String {
    if crumbs.is_empty() {
        return String::new();
    }

    let last = crumbs.len() - 1;
    let items: String = crumbs
        .iter()
        .enumerate()
        .map(|(i, crumb)| {
            if i == last {
                format!("<li aria-current=\"page\">{}</li>", text(&crumb.label))
            } else {
                format!(
                    "<li><a href=\"{}\">{}</a></li>",
                    attr(&crumb.href),
                    text(&crumb.label)
                )
            }
        })
        .collect();

    format!("<nav class=\"breadcrumbs\" aria-label=\"breadcrumb\"><ol>{items}</ol></nav>")
}

/// JSON-LD cannot contain a literal `</` inside a script element.
fn json_ld(meta: &PageMeta) -> String {
    if meta.structured_data.is_null() {
        return String::new();
    }
    let json = meta.structured_data.to_string().replace("</", "<\\/");
    format!("<script type=\"application/ld+json\">{json}</script>")
}

/// Wraps a page body in the shared document shell.
pub fn render(meta: &PageMeta, crumbs: &[Crumb], body: &str) -> String {
    let canonical = if meta.canonical.is_empty() {
        String::new()
    } else {
        format!("<link rel=\"canonical\" href=\"{}\">", attr(&meta.canonical))
    };

    format!(
        "<!DOCTYPE html>\n<html lang=\"es\">\n<head>\
<meta charset=\"utf-8\">\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
<title>{title}</title>\
<meta name=\"description\" content=\"{description}\">\
{canonical}\
<style>{STYLE}</style>\
</head>\n<body>\
<header><a href=\"/\"><strong>{site}</strong></a><a href=\"/buscar\">Buscar</a></header>\
<main>{crumbs}{body}</main>\
<footer><a href=\"/sitemap.xml\">Mapa del sitio</a></footer>\
{json_ld}\
</body>\n</html>\n",
        title = text(&meta.title),
        description = attr(&meta.description),
        site = text(SITE_NAME),
        crumbs = breadcrumbs(crumbs),
        json_ld = json_ld(meta),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_escapes_metadata() {
        let meta = PageMeta {
            title: "Pizza & <Fainá>".to_string(),
            description: "\"quoted\"".to_string(),
            canonical: "https://example.com".to_string(),
            structured_data: json!({ "name": "</script><b>" }),
        };

        let html = render(&meta, &[], "<p>cuerpo</p>");
        assert!(html.contains("<title>Pizza &amp; &lt;Fainá&gt;</title>"));
        assert!(html.contains("content=\"&quot;quoted&quot;\""));
        assert!(html.contains("<p>cuerpo</p>"));
        assert!(!html.contains("</script><b>"));
    }

    #[test]
    fn test_breadcrumbs_link_all_but_last() {
        let html = breadcrumbs(&[
            Crumb::new("Inicio", "/"),
            Crumb::new("Santa Fe", "/provincia/santa-fe"),
        ]);
        assert!(html.contains("<a href=\"/\">Inicio</a>"));
        assert!(html.contains("<li aria-current=\"page\">Santa Fe</li>"));
    }
}
