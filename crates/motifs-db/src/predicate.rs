//! Boolean query to SQL predicate compilation.
//!
//! A [`BoolExpr`] is turned into a parameterized WHERE fragment. Leaf values
//! never appear in the SQL text: each leaf is bound as a numbered `?N`
//! placeholder, numbered in pre-order starting after `param_offset`, and its
//! value is appended to `args` in the same order. Negation is pushed down to
//! the leaves, so every emitter only has to know its positive and negated
//! form.
//!
//! # Example
//!
//! ```rust,ignore
//! use motifs_core::parse_bool_query;
//! use motifs_db::predicate::{BoolPredicateBuilder, MotifColumns};
//!
//! let expr = parse_bool_query("foo AND NOT bar")?;
//! let predicate = BoolPredicateBuilder::new(&expr, 0).build(&MotifColumns);
//! // predicate.sql: "(m.public_id = ?1 OR ...) AND (m.public_id <> ?2 AND ...)"
//! // predicate.args: ["foo", "bar"]
//! ```

use motifs_core::BoolExpr;

/// Match-nothing clause used for empty groups.
const MATCH_NOTHING: &str = "FALSE";

/// A SQL fragment and the values for its placeholders, in binding order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub sql: String,
    pub args: Vec<String>,
}

/// Renders the condition for a single leaf.
pub trait PredicateEmitter {
    /// SQL for the leaf bound at `?{index}`. `value` is what will be bound
    /// there and must not be spliced into the returned SQL.
    fn emit(&self, index: usize, value: &str, negated: bool) -> String;
}

/// Numbered SQLite placeholder.
pub fn placeholder(index: usize) -> String {
    format!("?{}", index)
}

/// Motif columns of a row aliased `m`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MotifColumns;

impl PredicateEmitter for MotifColumns {
    fn emit(&self, index: usize, _value: &str, negated: bool) -> String {
        let p = placeholder(index);
        if negated {
            format!(
                "(m.public_id <> {p} AND m.motif_id NOT LIKE '%' || {p} || '%' AND m.motif_name NOT LIKE '%' || {p} || '%')"
            )
        } else {
            format!(
                "(m.public_id = {p} OR m.motif_id LIKE '%' || {p} || '%' OR m.motif_name LIKE '%' || {p} || '%')"
            )
        }
    }
}

/// Dataset columns of a row aliased `d`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DatasetColumns;

impl PredicateEmitter for DatasetColumns {
    fn emit(&self, index: usize, _value: &str, negated: bool) -> String {
        let p = placeholder(index);
        if negated {
            format!("(d.public_id <> {p} AND d.name NOT LIKE '%' || {p} || '%')")
        } else {
            format!("(d.public_id = {p} OR d.name LIKE '%' || {p} || '%')")
        }
    }
}

/// A leaf holds when either side holds; its negation requires both sides to
/// fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct EitherColumns<A, B>(pub A, pub B);

impl<A: PredicateEmitter, B: PredicateEmitter> PredicateEmitter for EitherColumns<A, B> {
    fn emit(&self, index: usize, value: &str, negated: bool) -> String {
        let left = self.0.emit(index, value, negated);
        let right = self.1.emit(index, value, negated);
        if negated {
            format!("({} AND {})", left, right)
        } else {
            format!("({} OR {})", left, right)
        }
    }
}

/// One expression compiled against each side of a motif row.
///
/// Only `rows` filters search candidates. The per-side fragments are kept
/// for diagnostics; their sizes are logged with each boolean search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPredicates {
    /// Motif columns only.
    pub motifs: Predicate,
    /// Owning dataset columns only.
    pub datasets: Predicate,
    /// Each leaf matched against motif or dataset columns. Used to select
    /// search candidates.
    pub rows: Predicate,
}

impl CompiledPredicates {
    /// Number of placeholders used; identical for every side.
    pub fn param_count(&self) -> usize {
        self.rows.args.len()
    }
}

/// Compile `expr` for the motif side, the dataset side and the combined row.
pub fn compile(expr: &BoolExpr, param_offset: usize) -> CompiledPredicates {
    let builder = BoolPredicateBuilder::new(expr, param_offset);
    CompiledPredicates {
        motifs: builder.build(&MotifColumns),
        datasets: builder.build(&DatasetColumns),
        rows: builder.build(&EitherColumns(MotifColumns, DatasetColumns)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Leaf,
    And,
    Or,
}

/// Generates a WHERE fragment for a boolean expression.
pub struct BoolPredicateBuilder<'a> {
    expr: &'a BoolExpr,
    param_offset: usize,
}

impl<'a> BoolPredicateBuilder<'a> {
    /// Create a builder.
    ///
    /// # Parameters
    ///
    /// * `expr` - The parsed expression
    /// * `param_offset` - The number of parameters already in the query
    pub fn new(expr: &'a BoolExpr, param_offset: usize) -> Self {
        Self { expr, param_offset }
    }

    /// Build the fragment using `emitter` for every leaf.
    pub fn build<E: PredicateEmitter + ?Sized>(&self, emitter: &E) -> Predicate {
        let mut args = Vec::new();
        let (sql, _) = self.walk(self.expr, false, emitter, &mut args);
        Predicate { sql, args }
    }

    fn walk<E: PredicateEmitter + ?Sized>(
        &self,
        expr: &BoolExpr,
        negated: bool,
        emitter: &E,
        args: &mut Vec<String>,
    ) -> (String, Shape) {
        let (children, conjunction) = match expr {
            BoolExpr::Term(value) => {
                args.push(value.clone());
                let index = self.param_offset + args.len();
                return (emitter.emit(index, value, negated), Shape::Leaf);
            }
            BoolExpr::Not(inner) => return self.walk(inner, !negated, emitter, args),
            // De Morgan: a negated AND renders as OR of negated children.
            BoolExpr::And(children) => (children, !negated),
            BoolExpr::Or(children) => (children, negated),
        };

        if children.is_empty() {
            return (MATCH_NOTHING.to_string(), Shape::Leaf);
        }

        let shape = if conjunction { Shape::And } else { Shape::Or };
        let mut parts = Vec::with_capacity(children.len());
        for child in children {
            let (sql, child_shape) = self.walk(child, negated, emitter, args);
            if child_shape != Shape::Leaf && child_shape != shape {
                parts.push(format!("({})", sql));
            } else {
                parts.push(sql);
            }
        }

        let joiner = if conjunction { " AND " } else { " OR " };
        (parts.join(joiner), shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(s: &str) -> BoolExpr {
        BoolExpr::Term(s.to_string())
    }

    fn not(e: BoolExpr) -> BoolExpr {
        BoolExpr::Not(Box::new(e))
    }

    /// Emits `+N` / `-N` so structure is easy to assert on.
    struct Marker;

    impl PredicateEmitter for Marker {
        fn emit(&self, index: usize, _value: &str, negated: bool) -> String {
            format!("{}{}", if negated { "-" } else { "+" }, index)
        }
    }

    fn marked(expr: &BoolExpr) -> String {
        BoolPredicateBuilder::new(expr, 0).build(&Marker).sql
    }

    #[test]
    fn test_single_term() {
        let predicate = BoolPredicateBuilder::new(&term("foo"), 0).build(&MotifColumns);
        assert_eq!(
            predicate.sql,
            "(m.public_id = ?1 OR m.motif_id LIKE '%' || ?1 || '%' OR m.motif_name LIKE '%' || ?1 || '%')"
        );
        assert_eq!(predicate.args, vec!["foo"]);
    }

    #[test]
    fn test_negated_dataset_term() {
        let predicate = BoolPredicateBuilder::new(&not(term("jaspar")), 0).build(&DatasetColumns);
        assert_eq!(
            predicate.sql,
            "(d.public_id <> ?1 AND d.name NOT LIKE '%' || ?1 || '%')"
        );
        assert_eq!(predicate.args, vec!["jaspar"]);
    }

    #[test]
    fn test_and_with_not() {
        let expr = BoolExpr::And(vec![term("foo"), not(term("bar"))]);
        assert_eq!(marked(&expr), "+1 AND -2");
    }

    #[test]
    fn test_not_over_or_becomes_and() {
        let expr = not(BoolExpr::Or(vec![term("a"), term("b")]));
        assert_eq!(marked(&expr), "-1 AND -2");
    }

    #[test]
    fn test_not_over_and_is_parenthesized_inside_and() {
        let expr = BoolExpr::And(vec![
            not(BoolExpr::And(vec![term("a"), term("b")])),
            term("c"),
        ]);
        assert_eq!(marked(&expr), "(-1 OR -2) AND +3");
    }

    #[test]
    fn test_or_inside_and_is_parenthesized() {
        let expr = BoolExpr::And(vec![BoolExpr::Or(vec![term("a"), term("b")]), term("c")]);
        assert_eq!(marked(&expr), "(+1 OR +2) AND +3");
    }

    #[test]
    fn test_and_inside_or_keeps_precedence_parens() {
        let expr = BoolExpr::Or(vec![BoolExpr::And(vec![term("a"), term("b")]), term("c")]);
        assert_eq!(marked(&expr), "(+1 AND +2) OR +3");
    }

    #[test]
    fn test_double_negation_cancels() {
        assert_eq!(marked(&not(not(term("a")))), "+1");
    }

    #[test]
    fn test_empty_group_matches_nothing() {
        assert_eq!(marked(&BoolExpr::And(vec![])), "FALSE");
        assert_eq!(marked(&not(BoolExpr::Or(vec![]))), "FALSE");
    }

    #[test]
    fn test_param_offset() {
        let expr = BoolExpr::Or(vec![term("a"), term("b")]);
        let predicate = BoolPredicateBuilder::new(&expr, 2).build(&Marker);
        assert_eq!(predicate.sql, "+3 OR +4");
        assert_eq!(predicate.args, vec!["a", "b"]);
    }

    #[test]
    fn test_placeholders_follow_pre_order() {
        let expr = BoolExpr::Or(vec![
            BoolExpr::And(vec![term("a"), not(term("b"))]),
            term("c"),
            not(BoolExpr::Or(vec![term("d"), term("e")])),
        ]);
        let predicate = BoolPredicateBuilder::new(&expr, 0).build(&Marker);
        assert_eq!(predicate.sql, "(+1 AND -2) OR +3 OR (-4 AND -5)");
        assert_eq!(predicate.args, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_user_text_is_never_in_sql() {
        let hostile = "x'); DROP TABLE motifs; --";
        let compiled = compile(&BoolExpr::And(vec![term(hostile), not(term("y"))]), 0);
        for predicate in [&compiled.motifs, &compiled.datasets, &compiled.rows] {
            assert!(!predicate.sql.contains("DROP"));
            assert_eq!(predicate.args, vec![hostile, "y"]);
        }
    }

    #[test]
    fn test_rows_side_combines_per_leaf() {
        let compiled = compile(&not(term("bar")), 0);
        assert_eq!(
            compiled.rows.sql,
            format!(
                "({} AND {})",
                MotifColumns.emit(1, "bar", true),
                DatasetColumns.emit(1, "bar", true)
            )
        );
        assert_eq!(compiled.param_count(), 1);
    }

    #[test]
    fn test_sides_share_args() {
        let expr = BoolExpr::Or(vec![term("foo"), term("bar")]);
        let compiled = compile(&expr, 0);
        assert_eq!(compiled.motifs.args, compiled.datasets.args);
        assert_eq!(compiled.motifs.args, compiled.rows.args);
        assert!(compiled.motifs.sql.contains("m.motif_name"));
        assert!(!compiled.motifs.sql.contains("d.name"));
        assert!(compiled.datasets.sql.contains("d.name"));
        assert!(!compiled.datasets.sql.contains("m.motif_id"));
    }
}
