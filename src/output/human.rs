//! Human-readable output formatting

use crate::names::VariantSet;
use crate::phonetic::PhoneticCode;
use crate::search::SearchResponse;

/// Format results for human consumption
pub fn format(response: &SearchResponse) -> String {
    let mut output = String::new();

    if response.hits.is_empty() {
        output.push_str(&format!(
            "No results found for '{}' ({:.1}ms)\n",
            response.query, response.elapsed_ms
        ));
        return output;
    }

    output.push_str(&format!(
        "Found {} results for '{}' ({:.1}ms)\n\n",
        response.hits.len(),
        response.query,
        response.elapsed_ms
    ));

    for (i, hit) in response.hits.iter().enumerate() {
        let record = &hit.record;
        output.push_str(&format!(
            "{}. {} [{}] ({:.2})\n",
            i + 1,
            record.display_name(),
            hit.id,
            hit.score
        ));

        let place: Vec<&str> = [record.city.as_deref(), record.state.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect();
        if !place.is_empty() {
            output.push_str(&format!("   {}\n", place.join(", ")));
        }
        if let Some(dob) = record.dob {
            output.push_str(&format!("   born {}\n", dob.format("%Y-%m-%d")));
        }

        output.push('\n');
    }

    output
}

pub fn format_expansion(name: &str, names: &VariantSet) -> String {
    if names.is_empty() {
        return format!("No expansion for '{}'\n", name);
    }
    let mut output = format!("{} ({} names)\n", name.trim(), names.len());
    for variant in names.iter() {
        output.push_str(&format!("   {}\n", variant));
    }
    output
}

pub fn format_phonetic(term: &str, code: &PhoneticCode) -> String {
    let show = |c: &Option<String>| c.clone().unwrap_or_else(|| "-".to_string());
    format!(
        "{}: primary {} alternate {}\n",
        term.trim(),
        show(&code.primary),
        show(&code.alternate)
    )
}
