use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::models::{OpeningHours, Pizzeria};

fn stars(rating: f32) -> String {
    let rounded = (rating.clamp(0.0, 5.0) * 2.0).round() / 2.0;
    // Truncation is intended: whole stars only, the half is checked separately.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let full = rounded.floor() as usize;
    let half = rounded.fract() >= 0.5;
    let empty = 5 - full - usize::from(half);

    format!(
        "<span class=\"stars\" aria-label=\"{rating:.1} de 5\">{}{}{}</span> ({rating:.1})",
        "★".repeat(full),
        if half { "⯪" } else { "" },
        "☆".repeat(empty),
    )
}

fn opening_hours(hours: &OpeningHours) -> String {
    let status = match hours.open_now {
        Some(true) => "<p class=\"open\">Abierto ahora</p>",
        Some(false) => "<p class=\"closed\">Cerrado ahora</p>",
        None => "",
    };

    if hours.weekday_text.is_empty() {
        return status.to_string();
    }

    let days: String = hours
        .weekday_text
        .iter()
        .map(|day| format!("<li>{}</li>", text(day)))
        .collect();

    format!("{status}<details><summary>Ver horarios</summary><ul>{days}</ul></details>")
}

pub fn pizzeria_card(pizzeria: &Pizzeria) -> String {
    let mut html = format!(
        "<li class=\"card\"><h3>{}</h3><p>{}</p>",
        text(&pizzeria.name),
        text(&pizzeria.address)
    );

    if let Some(rating) = pizzeria.rating {
        html.push_str(&stars(rating));
        if let Some(total) = pizzeria.user_ratings_total {
            html.push_str(&format!(" <small>{total} reseñas</small>"));
        }
    }
    if let Some(price) = pizzeria.price_marker() {
        html.push_str(&format!("<p>{price}</p>"));
    }
    if let Some(hours) = &pizzeria.opening_hours {
        html.push_str(&opening_hours(hours));
    }
    if let Some(phone) = &pizzeria.phone_number {
        html.push_str(&format!(
            "<p><a href=\"tel:{}\">{}</a></p>",
            attr(&phone.replace(' ', "")),
            text(phone)
        ));
    }
    if let Some(website) = &pizzeria.website_uri {
        html.push_str(&format!(
            "<p><a href=\"{}\" rel=\"nofollow noopener\" target=\"_blank\">Sitio web</a></p>",
            attr(website)
        ));
    }
    if let Some(maps) = &pizzeria.google_maps_url {
        html.push_str(&format!(
            "<p><a href=\"{}\" rel=\"noopener\" target=\"_blank\">Ver en Google Maps</a></p>",
            attr(maps)
        ));
    }

    html.push_str("</li>");
    html
}

pub fn pizzeria_grid(pizzerias: &[Pizzeria]) -> String {
    if pizzerias.is_empty() {
        return "<p class=\"card\">No se encontraron pizzerías para esta búsqueda.</p>".to_string();
    }
    let cards: String = pizzerias.iter().map(pizzeria_card).collect();
    format!("<ul class=\"grid\">{cards}</ul>")
}

/// Page links to show: first, last, and the neighbours of `current`, with
/// `None` standing for an elided run.
#[must_use]
pub fn page_numbers(current: usize, total: usize) -> Vec<Option<usize>> {
    if total <= 1 {
        return Vec::new();
    }

    let mut numbers = vec![Some(1)];
    let start = current.saturating_sub(1).max(2);
    let end = (current + 1).min(total - 1);

    if start > 2 {
        numbers.push(None);
    }
    numbers.extend((start..=end).map(Some));
    if end < total - 1 {
        numbers.push(None);
    }
    numbers.push(Some(total));
    numbers
}

fn page_href(base_path: &str, page: usize) -> String {
    if page <= 1 {
        base_path.to_string()
    } else {
        format!("{base_path}/{page}")
    }
}

pub fn pagination(current: usize, total: usize, base_path: &str) -> String {
    let numbers = page_numbers(current, total);
    if numbers.is_empty() {
        return String::new();
    }

    let mut items = String::new();
    if current > 1 {
        items.push_str(&format!(
            "<li><a href=\"{}\" aria-label=\"Página anterior\">&laquo;</a></li>",
            attr(&page_href(base_path, current - 1))
        ));
    }
    for number in numbers {
        match number {
            Some(page) if page == current => {
                items.push_str(&format!("<li aria-current=\"page\">{page}</li>"));
            }
            Some(page) => items.push_str(&format!(
                "<li><a href=\"{}\">{page}</a></li>",
                attr(&page_href(base_path, page))
            )),
            None => items.push_str("<li>&hellip;</li>"),
        }
    }
    if current < total {
        items.push_str(&format!(
            "<li><a href=\"{}\" aria-label=\"Página siguiente\">&raquo;</a></li>",
            attr(&page_href(base_path, current + 1))
        ));
    }

    format!("<nav><ul class=\"pagination\">{items}</ul></nav>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_numbers() {
        assert!(page_numbers(1, 1).is_empty());
        assert_eq!(page_numbers(1, 2), vec![Some(1), Some(2)]);
        assert_eq!(
            page_numbers(1, 5),
            vec![Some(1), Some(2), None, Some(5)]
        );
        assert_eq!(
            page_numbers(3, 5),
            vec![Some(1), Some(2), Some(3), Some(4), Some(5)]
        );
        assert_eq!(
            page_numbers(5, 9),
            vec![Some(1), None, Some(4), Some(5), Some(6), None, Some(9)]
        );
    }

    #[test]
    fn test_pagination_links() {
        let html = pagination(2, 3, "/pizzerias/napolitana/rosario");
        assert!(html.contains("href=\"/pizzerias/napolitana/rosario\""));
        assert!(html.contains("href=\"/pizzerias/napolitana/rosario/3\""));
        assert!(html.contains("<li aria-current=\"page\">2</li>"));
        assert!(pagination(1, 1, "/x").is_empty());
    }

    #[test]
    fn test_card_escapes_and_renders_optional_fields() {
        let pizzeria = Pizzeria {
            id: "1".to_string(),
            name: "Güerrín <Corrientes>".to_string(),
            address: "Av. Corrientes 1368".to_string(),
            rating: Some(4.4),
            user_ratings_total: Some(50000),
            price_level: Some(2),
            types: Vec::new(),
            phone_number: Some("+54 11 4371-8141".to_string()),
            website_uri: None,
            opening_hours: Some(OpeningHours {
                weekday_text: vec!["lunes: 11:00–1:00".to_string()],
                open_now: Some(true),
            }),
            google_maps_url: Some("https://maps.google.com/?cid=2".to_string()),
        };

        let html = pizzeria_card(&pizzeria);
        assert!(html.contains("Güerrín &lt;Corrientes&gt;"));
        assert!(html.contains("50000 reseñas"));
        assert!(html.contains("Abierto ahora"));
        assert!(html.contains("tel:+5411"));
        assert!(html.contains("Ver en Google Maps"));
        assert!(!html.contains("Sitio web"));
    }

    #[test]
    fn test_stars() {
        assert!(stars(4.4).starts_with("<span class=\"stars\" aria-label=\"4.4 de 5\">★★★★⯪</span>"));
        assert!(stars(5.0).contains("★★★★★<"));
        assert!(stars(0.0).contains("☆☆☆☆☆"));
    }
}
