use crate::triples::Triple;

/// Normalized text features of one triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessContext {
    /// Lowercased `Entity B`, the business object the triple is about
    pub main_object: String,
    /// Lowercased relationship followed by the lowercased `Entity A` tokens
    pub related_terms: String,
    /// The original triple as "A Relationship B"
    pub full_context: String,
}

impl BusinessContext {
    /// Clustering input: the main object twice (to up-weight it), then the related terms
    pub fn feature_text(&self) -> String {
        format!("{} {} {}", self.main_object, self.main_object, self.related_terms)
    }
}

/// Derive the business context of a triple. Stop words are left in place;
/// they are dropped during vectorization.
pub fn extract_context(triple: &Triple) -> BusinessContext {
    let entity_a = triple.entity_a.to_lowercase();
    let mut related_terms = vec![triple.relationship.to_lowercase()];
    related_terms.extend(entity_a.split_whitespace().map(str::to_string));

    BusinessContext {
        main_object: triple.entity_b.to_lowercase(),
        related_terms: related_terms.join(" "),
        full_context: triple.render(),
    }
}
