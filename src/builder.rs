//! Statement assembly.
//!
//! [`QueryBuilder`] owns the mapping document and the out-of-band settings
//! (default table, DISTINCT, timezone) and compiles one request per
//! [`build`](QueryBuilder::build) call. All per-build state lives in a
//! [`BuildContext`] created at the top of the call, so a builder can be
//! shared across threads.

use chrono::{FixedOffset, Offset, Utc};
use indexmap::IndexSet;
use std::collections::HashSet;

use crate::error::{BuildError, BuildResult};
use crate::filter;
use crate::mapping::{FieldResolution, JoinDescriptor, JoinSource, JoinType, MappingDocument};
use crate::request::ReportRequest;
use crate::sql::{Token, TokenStream};

/// Compiles report requests into `SELECT` statements.
pub struct QueryBuilder {
    mapping: MappingDocument,

    /// Physical table the statement selects from.
    pub default_table: String,

    /// Alias for the default table; pre-seeded as already joined.
    pub default_table_alias: String,

    /// Emit `SELECT DISTINCT`.
    pub distinct: bool,

    /// UTC offset applied when epoch-second range bounds are normalized.
    pub timezone: FixedOffset,
}

impl QueryBuilder {
    /// Create a builder over a mapping document.
    pub fn new(
        mapping: MappingDocument,
        default_table: impl Into<String>,
        default_table_alias: impl Into<String>,
    ) -> Self {
        Self {
            mapping,
            default_table: default_table.into(),
            default_table_alias: default_table_alias.into(),
            distinct: false,
            timezone: Utc.fix(),
        }
    }

    /// Emit `SELECT DISTINCT`.
    pub fn with_distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    /// Override the default table and its alias.
    pub fn with_default_table(
        mut self,
        table: impl Into<String>,
        alias: impl Into<String>,
    ) -> Self {
        self.default_table = table.into();
        self.default_table_alias = alias.into();
        self
    }

    /// Set the UTC offset used for date normalization.
    pub fn with_timezone(mut self, timezone: FixedOffset) -> Self {
        self.timezone = timezone;
        self
    }

    /// The mapping document this builder compiles against.
    pub fn mapping(&self) -> &MappingDocument {
        &self.mapping
    }

    /// Compile a request into a single `SELECT` statement.
    ///
    /// Fails fast on an empty field list, a field absent from the mapping,
    /// or mapping entries missing join settings; no partial statement is
    /// returned.
    pub fn build(&self, request: &ReportRequest) -> BuildResult<String> {
        if request.fields.is_empty() {
            return Err(BuildError::InvalidRequest(
                "report data fields missing".to_string(),
            ));
        }

        let mut ctx = BuildContext::new(&self.default_table_alias);
        let mut projections: Vec<TokenStream> = Vec::new();

        for field_name in &request.fields {
            let resolution = self
                .mapping
                .resolution(field_name)
                .ok_or_else(|| BuildError::UnmappedField(field_name.clone()))?;

            let join = self.field_join(field_name, resolution)?;
            self.ensure_joined(&mut ctx, join)?;

            match &resolution.rel_join {
                None => {
                    projections.push(projection(&join.alias, &resolution.field, &resolution.alias));
                }
                Some(rel) => {
                    // Project the display column, and join its table using
                    // the field's own column as the dependency edge.
                    projections.push(projection(&rel.alias, &rel.display, &resolution.alias));

                    let (model, model_field) = field_name.split_once('.').ok_or_else(|| {
                        BuildError::IncompleteFieldMapping {
                            field: field_name.clone(),
                            message: "rel_join requires a dotted Model.field name".to_string(),
                        }
                    })?;
                    let display_join = JoinDescriptor {
                        join_type: rel.join_type,
                        table: rel.table.clone(),
                        alias: rel.alias.clone(),
                        on: rel.on.clone(),
                        model: model.to_string(),
                        field: model_field.to_string(),
                        display: None,
                    };
                    self.ensure_joined(&mut ctx, &display_join)?;
                }
            }
        }

        let conditions = filter::conditions(&request.filters, self.timezone)?;

        Ok(self.assemble(&projections, &ctx, &conditions))
    }

    /// Resolve a field's `join` attribute; an inline descriptor overrides
    /// the table-level join for this field only.
    fn field_join<'a>(
        &'a self,
        field_name: &str,
        resolution: &'a FieldResolution,
    ) -> BuildResult<&'a JoinDescriptor> {
        match &resolution.join {
            None => Err(BuildError::IncompleteFieldMapping {
                field: field_name.to_string(),
                message: "missing join settings".to_string(),
            }),
            Some(JoinSource::Inline(descriptor)) => Ok(descriptor),
            Some(JoinSource::Alias(alias)) => self.mapping.join(alias).ok_or_else(|| {
                BuildError::InconsistentMapping(format!(
                    "field '{}' references undefined join '{}'",
                    field_name, alias
                ))
            }),
        }
    }

    /// Guarantee that `join` and everything it depends on are present in
    /// the statement, in dependency order. Idempotent by alias.
    fn ensure_joined(&self, ctx: &mut BuildContext, join: &JoinDescriptor) -> BuildResult<()> {
        if !ctx.is_joined(&join.model) {
            if !ctx.resolving.insert(join.alias.clone()) {
                return Err(BuildError::InconsistentMapping(format!(
                    "join dependency cycle at '{}'",
                    join.alias
                )));
            }
            let parent = self.mapping.join(&join.model).ok_or_else(|| {
                BuildError::InconsistentMapping(format!(
                    "no join settings for table '{}'",
                    join.model
                ))
            })?;
            self.ensure_joined(ctx, parent)?;
        }

        if !ctx.is_joined(&join.alias) {
            ctx.push_join(join);
        }
        Ok(())
    }

    fn assemble(
        &self,
        projections: &[TokenStream],
        ctx: &BuildContext,
        conditions: &[String],
    ) -> String {
        let mut ts = TokenStream::new();
        ts.push(Token::Select).space();
        if self.distinct {
            ts.push(Token::Distinct).space();
        }
        for (i, projection) in projections.iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            ts.append(projection);
        }
        ts.space()
            .push(Token::From)
            .space()
            .push(Token::Ident(self.default_table.clone()))
            .space()
            .push(Token::Ident(self.default_table_alias.clone()));
        ts.append(&ctx.join_sql);
        ts.space()
            .push(Token::Where)
            .space()
            .push(Token::Raw("(1=1)".to_string()));
        for condition in conditions {
            ts.space()
                .push(Token::And)
                .space()
                .lparen()
                .push(Token::Raw(condition.clone()))
                .rparen();
        }
        ts.serialize()
    }
}

/// Per-build mutable state: which aliases are joined, and the accumulated
/// join clauses. Discarded when `build` returns.
struct BuildContext {
    joined: IndexSet<String>,
    resolving: HashSet<String>,
    join_sql: TokenStream,
}

impl BuildContext {
    fn new(default_alias: &str) -> Self {
        let mut joined = IndexSet::new();
        joined.insert(default_alias.to_string());
        Self {
            joined,
            resolving: HashSet::new(),
            join_sql: TokenStream::new(),
        }
    }

    fn is_joined(&self, alias: &str) -> bool {
        self.joined.contains(alias)
    }

    /// Append `<TYPE> JOIN <table> <alias> ON <model>.<field> = <alias>.<on>`
    /// and mark the alias joined.
    fn push_join(&mut self, join: &JoinDescriptor) {
        self.join_sql.space();
        match join.join_type {
            JoinType::Inner => self.join_sql.push(Token::Inner),
            JoinType::Left => self.join_sql.push(Token::Left),
            JoinType::Right => self.join_sql.push(Token::Right),
            JoinType::Full => self.join_sql.push(Token::Full).space().push(Token::Outer),
            JoinType::Cross => self.join_sql.push(Token::Cross),
        };
        self.join_sql
            .space()
            .push(Token::Join)
            .space()
            .push(Token::Ident(join.table.clone()))
            .space()
            .push(Token::Ident(join.alias.clone()))
            .space()
            .push(Token::On)
            .space()
            .push(Token::Column {
                table: join.model.clone(),
                column: join.field.clone(),
            })
            .space()
            .push(Token::Eq)
            .space()
            .push(Token::Column {
                table: join.alias.clone(),
                column: join.on.clone(),
            });
        self.joined.insert(join.alias.clone());
    }
}

/// `<table-alias>.<column> AS <output-alias>`
fn projection(table_alias: &str, column: &str, output_alias: &str) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.push(Token::Column {
        table: table_alias.to_string(),
        column: column.to_string(),
    })
    .space()
    .push(Token::As)
    .space()
    .push(Token::Ident(output_alias.to_string()));
    ts
}
