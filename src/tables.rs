use crate::model::attribute::RoleFamily;

pub const PERSONALITY_CODES: [&str; 16] = [
    "INTJ", "INTP", "ENTJ", "ENTP", "INFJ", "INFP", "ENFJ", "ENFP",
    "ISTJ", "ISFJ", "ESTJ", "ESFJ", "ISTP", "ISFP", "ESTP", "ESFP",
];

/// Row = first member's code, column = second member's code, both in
/// `PERSONALITY_CODES` order. Not symmetric in every cell.
#[rustfmt::skip]
pub const PERSONALITY_MATRIX: [[f64; 16]; 16] = [
    // INTJ
    [0.60, 0.70, 0.75, 0.80, 0.70, 0.75, 0.80, 0.95, 0.45, 0.45, 0.55, 0.55, 0.50, 0.50, 0.60, 0.60],
    // INTP
    [0.70, 0.60, 0.80, 0.75, 0.75, 0.70, 0.85, 0.80, 0.50, 0.50, 0.60, 0.60, 0.45, 0.45, 0.55, 0.55],
    // ENTJ
    [0.75, 0.80, 0.60, 0.70, 0.80, 0.85, 0.70, 0.75, 0.55, 0.55, 0.45, 0.45, 0.60, 0.60, 0.50, 0.50],
    // ENTP
    [0.80, 0.75, 0.70, 0.60, 0.85, 0.80, 0.75, 0.70, 0.60, 0.60, 0.50, 0.50, 0.55, 0.55, 0.45, 0.45],
    // INFJ
    [0.70, 0.75, 0.80, 0.85, 0.60, 0.70, 0.75, 1.00, 0.45, 0.45, 0.55, 0.55, 0.50, 0.50, 0.60, 0.60],
    // INFP
    [0.75, 0.70, 0.85, 0.80, 0.70, 0.60, 1.00, 0.75, 0.50, 0.50, 0.60, 0.60, 0.45, 0.45, 0.55, 0.55],
    // ENFJ
    [0.80, 0.85, 0.70, 0.75, 0.75, 0.95, 0.60, 0.70, 0.55, 0.55, 0.45, 0.45, 0.60, 0.60, 0.50, 0.50],
    // ENFP
    [1.00, 0.80, 0.75, 0.70, 0.95, 0.75, 0.70, 0.60, 0.60, 0.60, 0.50, 0.50, 0.55, 0.55, 0.45, 0.45],
    // ISTJ
    [0.45, 0.50, 0.55, 0.60, 0.45, 0.50, 0.55, 0.60, 0.60, 0.70, 0.75, 0.80, 0.70, 0.75, 0.80, 0.70],
    // ISFJ
    [0.45, 0.50, 0.55, 0.60, 0.45, 0.50, 0.55, 0.60, 0.70, 0.60, 0.80, 0.75, 0.75, 0.70, 0.75, 0.80],
    // ESTJ
    [0.55, 0.60, 0.45, 0.50, 0.55, 0.60, 0.45, 0.50, 0.75, 0.80, 0.60, 0.70, 0.80, 0.85, 0.70, 0.75],
    // ESFJ
    [0.55, 0.60, 0.45, 0.50, 0.55, 0.60, 0.45, 0.50, 0.80, 0.75, 0.70, 0.60, 0.85, 0.80, 0.75, 0.70],
    // ISTP
    [0.50, 0.45, 0.60, 0.55, 0.50, 0.45, 0.60, 0.55, 0.70, 0.75, 0.80, 0.85, 0.60, 0.70, 0.75, 0.80],
    // ISFP
    [0.50, 0.45, 0.60, 0.55, 0.50, 0.45, 0.60, 0.55, 0.75, 0.70, 0.85, 0.80, 0.70, 0.60, 0.80, 0.75],
    // ESTP
    [0.60, 0.55, 0.50, 0.45, 0.60, 0.55, 0.50, 0.45, 0.80, 0.70, 0.70, 0.75, 0.75, 0.80, 0.60, 0.70],
    // ESFP
    [0.60, 0.55, 0.50, 0.45, 0.60, 0.55, 0.50, 0.45, 0.75, 0.80, 0.75, 0.70, 0.80, 0.75, 0.70, 0.60],
];

/// Top-level units considered complementary. Looked up in both directions.
pub const UNIT_SYNERGY: [(&str, &str); 8] = [
    ("engineering", "product"),
    ("engineering", "research"),
    ("engineering", "design"),
    ("product", "design"),
    ("product", "sales"),
    ("sales", "marketing"),
    ("marketing", "design"),
    ("operations", "finance"),
];

pub fn has_unit_synergy(a: &str, b: &str) -> bool {
    let (a, b) = (a.to_lowercase(), b.to_lowercase());
    UNIT_SYNERGY
        .iter()
        .any(|(x, y)| (*x == a && *y == b) || (*x == b && *y == a))
}

/// Legacy role pairs that work especially well together. Looked up in both directions.
pub const COMPLEMENTARY_ROLES: [(&str, &str); 8] = [
    ("engineer", "designer"),
    ("engineer", "product manager"),
    ("designer", "product manager"),
    ("researcher", "engineer"),
    ("sales", "marketing"),
    ("analyst", "sales"),
    ("data scientist", "product manager"),
    ("hr", "manager"),
];

pub fn are_complementary_roles(a: &str, b: &str) -> bool {
    COMPLEMENTARY_ROLES
        .iter()
        .any(|(x, y)| (*x == a && *y == b) || (*x == b && *y == a))
}

pub fn legacy_role_family(label: &str) -> Option<RoleFamily> {
    let family = match label {
        "engineer" | "developer" | "researcher" | "analyst" | "data scientist" => RoleFamily::Technical,
        "designer" | "writer" | "marketing" | "marketer" => RoleFamily::Creative,
        "sales" | "finance" | "product manager" | "consultant" => RoleFamily::Business,
        "hr" | "recruiter" | "manager" | "coach" => RoleFamily::People,
        _ => return None,
    };
    Some(family)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_values_are_bounded() {
        for row in PERSONALITY_MATRIX.iter() {
            for value in row.iter() {
                assert!((0.0..=1.0).contains(value));
            }
        }
    }

    #[test]
    fn synergy_is_case_insensitive_and_undirected() {
        assert!(has_unit_synergy("Product", "ENGINEERING"));
        assert!(has_unit_synergy("finance", "operations"));
        assert!(!has_unit_synergy("finance", "design"));
    }
}
