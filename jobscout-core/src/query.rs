use crate::types::SearchQuery;

/// Builds the search queries for one run: for every role an exact-phrase query
/// across all locations, followed by a `<role> remote` query per role.
pub fn build_search_queries(roles: &[String], locations: &[String]) -> Vec<SearchQuery> {
    let location_clause = locations.join(" OR ");

    let phrase_queries = roles
        .iter()
        .map(|role| SearchQuery::new(format!("\"{}\" jobs {}", role, location_clause)));
    let remote_queries = roles
        .iter()
        .map(|role| SearchQuery::new(format!("{} remote", role)));

    phrase_queries.chain(remote_queries).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_two_queries_per_role() {
        let queries = build_search_queries(&strings(&["a", "b"]), &strings(&["x"]));
        assert_eq!(queries.len(), 4);
    }

    #[test]
    fn test_query_shapes_and_order() {
        let queries = build_search_queries(
            &strings(&["localization project manager", "transcreation lead"]),
            &strings(&["remote", "Bangalore"]),
        );

        let texts: Vec<&str> = queries.iter().map(|q| q.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "\"localization project manager\" jobs remote OR Bangalore",
                "\"transcreation lead\" jobs remote OR Bangalore",
                "localization project manager remote",
                "transcreation lead remote",
            ]
        );
    }

    #[test]
    fn test_no_roles_yields_no_queries() {
        assert!(build_search_queries(&[], &strings(&["remote"])).is_empty());
    }
}
