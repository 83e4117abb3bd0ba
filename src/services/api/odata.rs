/// `$filter` / `$select` / `$expand` query for the OData read endpoints.
#[derive(Debug, Clone, Default)]
pub struct ODataQuery {
    filter: Option<String>,
    select: Vec<String>,
    expand: Vec<String>,
}

impl ODataQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, expr: impl Into<String>) -> Self {
        self.filter = Some(expr.into());
        self
    }

    pub fn select(mut self, fields: &[&str]) -> Self {
        self.select.extend(fields.iter().map(|f| f.to_string()));
        self
    }

    pub fn expand(mut self, clause: impl Into<String>) -> Self {
        self.expand.push(clause.into());
        self
    }

    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(filter) = &self.filter {
            pairs.push(("$filter", filter.clone()));
        }
        if !self.select.is_empty() {
            pairs.push(("$select", self.select.join(",")));
        }
        if !self.expand.is_empty() {
            pairs.push(("$expand", self.expand.join(",")));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_in_order() {
        let query = ODataQuery::new()
            .filter("status eq 1")
            .select(&["id", "serviceDate"])
            .expand("CategoryServices");
        assert_eq!(
            query.pairs(),
            vec![
                ("$filter", "status eq 1".to_string()),
                ("$select", "id,serviceDate".to_string()),
                ("$expand", "CategoryServices".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_query_has_no_pairs() {
        assert!(ODataQuery::new().pairs().is_empty());
    }
}
