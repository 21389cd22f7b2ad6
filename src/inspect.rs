//! Human-readable summary of what a snapshot would generate.

use std::fmt::Write;

use crate::config::Config;
use crate::delegate::{self, Resolution, SourceMember};
use crate::diagnostics::GenError;
use crate::discover;
use crate::sumtype::SumTypeModel;
use crate::symbols::{Snapshot, SymbolIndex};

pub fn inspect(snapshot: &Snapshot, config: &Config) -> Result<String, GenError> {
    let index = SymbolIndex::build(snapshot)?;
    let found = discover::discover(&index, &config.markers);
    let mut out = String::new();

    if found.is_empty() {
        out.push_str("nothing to generate\n");
        return Ok(out);
    }

    for input in &found.sum_types {
        let model = SumTypeModel::build(&index, input, config)?;
        let _ = writeln!(out, "sum type {} (from {})", model.name, model.trait_path());
        for (arm, tag) in model.tag_table() {
            let _ = writeln!(out, "  {tag:>3}  {arm}");
        }
        for supertrait in &model.supertraits {
            let _ = writeln!(out, "  also dispatches {}", supertrait.qualified_name());
        }
    }

    for input in &found.hosts {
        let plan = delegate::plan_host(&index, input);
        let source = plan.source.map_or_else(|| format!("{} (unknown)", input.field.ty), |s| s.qualified_name());
        let _ = writeln!(
            out,
            "host {} via {}: {}",
            plan.host.qualified_name(),
            plan.field.name,
            source
        );
        for iface in &plan.interfaces {
            let _ = writeln!(out, "  {}", iface.interface.qualified_name());
            for member in &iface.members {
                let how = match member.resolution {
                    Resolution::Delegate(SourceMember::Property(_)) => "forward property",
                    Resolution::Delegate(SourceMember::Field(_)) => "forward field",
                    Resolution::Delegate(SourceMember::Method(_)) => "forward method",
                    Resolution::HostDefined(_) => "host defined",
                    Resolution::Unmatched => "unmatched",
                };
                let _ = writeln!(out, "    {:<20} {how}", member.member.name());
            }
        }
    }

    Ok(out)
}
