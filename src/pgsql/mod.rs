//! The PostgreSQL translation backend: binding, rewriting, and emission.
//!
//! `translate` is the whole pipeline; `rewrite` runs binding and the rewrite
//! passes without emission for callers that drive the `Emitter` themselves
//! (e.g. with literal stripping enabled).

use std::collections::BTreeMap;

use crate::cypher::ast::{RegularQuery, SingleQuery};
use crate::graph_catalog::KindMapper;

pub mod annotations;
pub mod binder;
pub mod emitter;
pub mod errors;
pub mod function_registry;
pub mod translator;
pub mod types;
pub mod update_rewriter;
pub mod variable_length_cte;

pub use annotations::Translation;
pub use binder::Binder;
pub use emitter::Emitter;
pub use errors::TranslateError;
pub use translator::Translator;

use types::CypherValue;

/// Storage table holding nodes: `node(id, kind_ids int2[], properties jsonb)`.
pub const NODE_TABLE: &str = "node";
/// Storage table holding edges:
/// `edge(id, start_id, end_id, kind_id int2, properties jsonb)`.
pub const EDGE_TABLE: &str = "edge";

/// Bind and rewrite the query in place, returning the collected parameter
/// table. The tree is left in its emission-ready form.
pub fn rewrite<K>(
    query: &mut RegularQuery,
    kind_mapper: &K,
) -> Result<BTreeMap<String, CypherValue>, TranslateError>
where
    K: KindMapper + ?Sized,
{
    let mut binder = Binder::new();
    binder.scan(query)?;

    let SingleQuery::SinglePart(single_part) = &mut query.single_query else {
        return Err(TranslateError::MultiPartQueryUnsupported);
    };

    let mut translator = Translator::new(&mut binder, kind_mapper);
    translator.run_semantic_passes(single_part)?;
    translator.run_optimization_passes(single_part)?;

    Ok(binder.parameters())
}

/// Translate a parsed query into SQL text plus its parameter table. The
/// query tree is consumed destructively; translate a fresh tree per call.
pub fn translate<K>(
    query: &mut RegularQuery,
    kind_mapper: &K,
) -> Result<Translation, TranslateError>
where
    K: KindMapper + ?Sized,
{
    log::debug!("translating query");

    let parameters = rewrite(query, kind_mapper)?;
    let emitter = Emitter::new(false, kind_mapper);
    let sql = emitter.write(query)?;

    Ok(Translation { sql, parameters })
}
