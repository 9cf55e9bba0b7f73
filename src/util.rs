use crate::models::{Event, MAX_STARS};

/// Render a rating as filled/empty stars, e.g. `★★★☆☆`. Out-of-range values are clamped.
pub fn render_stars(stars: Option<i32>) -> String {
    let filled = stars.unwrap_or(0).clamp(0, MAX_STARS) as usize;
    let empty = MAX_STARS as usize - filled;
    format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
}

/// One display line for an event: id, rating, title, then bands and their members.
pub fn format_event(event: &Event) -> String {
    let mut line = format!(
        "#{:<5} {} {}",
        event.id,
        render_stars(event.nb_stars),
        event.title.as_deref().unwrap_or("(untitled)")
    );
    let bands: Vec<String> = event
        .bands
        .iter()
        .map(|b| {
            let name = b.name.as_deref().unwrap_or("?");
            let members: Vec<&str> = b.members.iter().filter_map(|m| m.name.as_deref()).collect();
            if members.is_empty() {
                name.to_string()
            } else {
                format!("{} ({})", name, members.join(", "))
            }
        })
        .collect();
    if !bands.is_empty() {
        line.push_str(" | ");
        line.push_str(&bands.join("; "));
    }
    if let Some(comment) = event.comment.as_deref().filter(|c| !c.is_empty()) {
        line.push_str(&format!(" | \"{}\"", comment));
    }
    line
}

pub fn format_events(events: &[Event]) -> String {
    if events.is_empty() {
        return "No events.\n".to_string();
    }
    let mut out = String::new();
    for e in events {
        out.push_str(&format_event(e));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Band, Member};

    #[test]
    fn stars_are_clamped() {
        assert_eq!(render_stars(Some(3)), "★★★☆☆");
        assert_eq!(render_stars(None), "☆☆☆☆☆");
        assert_eq!(render_stars(Some(9)), "★★★★★");
        assert_eq!(render_stars(Some(-2)), "☆☆☆☆☆");
    }

    #[test]
    fn event_line_lists_bands_and_members() {
        let mut ev = Event::new(3, "Motocultor");
        ev.nb_stars = Some(2);
        ev.bands.push(Band {
            name: Some("Pink Floyd".into()),
            members: vec![Member { name: Some("Kelsey Gibbs".into()) }],
        });
        ev.bands.push(Band { name: None, members: vec![] });
        assert_eq!(
            format_event(&ev),
            "#3     ★★☆☆☆ Motocultor | Pink Floyd (Kelsey Gibbs); ?"
        );
    }
}
