pub mod span;
pub mod diagnostics;
pub mod symbols;
pub mod config;
pub mod discover;
pub mod emit;
pub mod delegate;
pub mod sumtype;
pub mod artifact;
pub mod inspect;
pub mod output;
pub mod watch;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use artifact::Artifact;
use config::Config;
use diagnostics::GenError;
use discover::{HostInput, SumTypeInput};
use symbols::{Snapshot, SymbolIndex};

/// Run one generation episode over a snapshot (index → discover → synthesize).
///
/// Artifacts come back sorted by name. Either every artifact is produced or the
/// episode fails; nothing partial is returned.
pub fn generate(snapshot: &Snapshot, config: &Config) -> Result<Vec<Artifact>, GenError> {
    let index = SymbolIndex::build(snapshot)?;
    let found = discover::discover(&index, &config.markers);

    let sum_types = map_inputs(config.emit.parallel, &found.sum_types, |input| {
        sum_type_artifact(&index, input, config)
    });
    let delegates = map_inputs(config.emit.parallel, &found.hosts, |input| {
        delegation_artifact(&index, input, config)
    });

    let mut artifacts = Vec::with_capacity(sum_types.len() + delegates.len());
    for result in sum_types {
        artifacts.push(result?);
    }
    artifacts.extend(delegates.into_iter().flatten());
    artifacts.sort_by(|a, b| a.name.cmp(&b.name));

    if let Some(pair) = artifacts.windows(2).find(|pair| pair[0].name == pair[1].name) {
        return Err(GenError::generation(format!(
            "two artifacts would be written as `{}`",
            pair[0].name
        )));
    }

    info!(
        types = index.len(),
        sum_types = found.sum_types.len(),
        hosts = found.hosts.len(),
        artifacts = artifacts.len(),
        "generation finished"
    );
    Ok(artifacts)
}

/// Parse a JSON snapshot and generate from it.
pub fn generate_from_json(json: &str, config: &Config) -> Result<Vec<Artifact>, GenError> {
    let snapshot = Snapshot::from_json(json)?;
    generate(&snapshot, config)
}

fn map_inputs<T, R, F>(parallel: bool, inputs: &[T], f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    if parallel {
        inputs.par_iter().map(f).collect()
    } else {
        inputs.iter().map(f).collect()
    }
}

fn sum_type_artifact(
    index: &SymbolIndex,
    input: &SumTypeInput<'_>,
    config: &Config,
) -> Result<Artifact, GenError> {
    let (name, source) = sumtype::synthesize(index, input, config)?;
    let artifact = Artifact::sum_type(&name, source);
    debug!(artifact = %artifact.name, hash = %artifact.hash_hex(), "sum type ready");
    Ok(artifact)
}

fn delegation_artifact(index: &SymbolIndex, input: &HostInput<'_>, config: &Config) -> Option<Artifact> {
    let plan = delegate::plan_host(index, input);
    if plan.source.is_none() {
        warn!(
            host = %input.host.qualified_name(),
            field = %input.field.name,
            ty = %input.field.ty,
            "delegation field type is not in the snapshot"
        );
    }
    let Some(source) = delegate::synthesize(&plan, config) else {
        debug!(host = %input.host.qualified_name(), "no members matched, skipping host");
        return None;
    };
    let artifact = Artifact::delegates(&input.host.name, source);
    debug!(
        artifact = %artifact.name,
        delegates = plan.delegate_count(),
        hash = %artifact.hash_hex(),
        "delegation ready"
    );
    Some(artifact)
}
