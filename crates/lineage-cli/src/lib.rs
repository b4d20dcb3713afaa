//! CLI logic for the Lineage class-diagram tool.
//!
//! The CLI loads a type catalog, registers every type it lists in one shared
//! repository and renders one SVG diagram per focus type.

pub mod error;

mod args;
mod catalog;
mod config;

pub use args::Args;
pub use catalog::load_catalog;
pub use config::load_config;
pub use error::CliError;

use std::{
    fs,
    path::{Path, PathBuf},
    thread,
};

use log::{info, warn};

use lineage::{DiagramBuilder, TypeCatalog, TypeRepository, identifier::TypeId};

/// Run the Lineage CLI application
///
/// Every focus type is rendered independently. A diagram that fails to
/// render is reported without stopping the others; the successful ones are
/// still written.
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Configuration and catalog loading errors
/// - Focus types missing from the catalog
/// - Failed diagrams, aggregated in [`CliError::Diagrams`]
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(
        input_path = args.input,
        output_dir = args.output;
        "Processing type catalog"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let catalog = catalog::load_catalog(&args.input)?;

    let repository = TypeRepository::new();
    for id in catalog.ids() {
        if let Err(err) = repository.discover(id, &catalog) {
            warn!(
                qualified_name = id.to_string(),
                err = err.to_string();
                "Type left out of the hierarchy"
            );
        }
    }

    let focuses = focus_types(args, &catalog)?;
    let builder = DiagramBuilder::new(app_config)?;

    let results = render_all(&builder, &repository, &catalog, &focuses, args.jobs)?;

    let output_dir = Path::new(&args.output);
    let total = results.len();
    let mut errors = Vec::new();
    for (focus, result) in focuses.iter().zip(results) {
        match result.and_then(|svg| write_diagram(output_dir, *focus, &svg)) {
            Ok(path) => {
                info!(output_file = path.display().to_string(); "SVG exported successfully");
            }
            Err(err) => errors.push(err),
        }
    }

    if errors.is_empty() {
        info!(diagrams = total; "All diagrams rendered");
        Ok(())
    } else {
        Err(CliError::Diagrams {
            failed: errors.len(),
            total,
            errors,
        })
    }
}

/// The focus types named on the command line, or every included catalog type.
fn focus_types(args: &Args, catalog: &TypeCatalog) -> Result<Vec<TypeId>, CliError> {
    if args.focus.is_empty() {
        return Ok(catalog.included().collect());
    }

    args.focus
        .iter()
        .map(|name| {
            let id = TypeId::new(name);
            match catalog.get(id) {
                Some(_) => Ok(id),
                None => Err(CliError::UnknownFocus(name.clone())),
            }
        })
        .collect()
}

/// Renders `focuses` on up to `jobs` threads, keeping the input order.
fn render_all(
    builder: &DiagramBuilder,
    repository: &TypeRepository,
    catalog: &TypeCatalog,
    focuses: &[TypeId],
    jobs: usize,
) -> Result<Vec<Result<Vec<u8>, CliError>>, CliError> {
    let render = |focus: TypeId| {
        builder
            .render(focus, repository, catalog)
            .map_err(|source| CliError::Render {
                focus: focus.to_string(),
                source,
            })
    };

    let jobs = jobs.clamp(1, focuses.len().max(1));
    if jobs == 1 {
        return Ok(focuses.iter().copied().map(render).collect());
    }

    let chunk_size = focuses.len().div_ceil(jobs);
    thread::scope(|scope| {
        let workers: Vec<_> = focuses
            .chunks(chunk_size)
            .map(|chunk| scope.spawn(move || chunk.iter().copied().map(render).collect::<Vec<_>>()))
            .collect();

        let mut results = Vec::with_capacity(focuses.len());
        for worker in workers {
            let chunk = worker.join().map_err(|_| CliError::WorkerPanicked)?;
            results.extend(chunk);
        }
        Ok(results)
    })
}

/// The file of the diagram of `focus`: one directory per package segment.
pub fn diagram_path(output_dir: &Path, focus: TypeId) -> PathBuf {
    let mut path = output_dir.to_path_buf();
    if let Some(package) = focus.package() {
        path.extend(package.split('.'));
    }
    path.push(format!("{}.svg", focus.simple_name()));
    path
}

fn write_diagram(output_dir: &Path, focus: TypeId, svg: &[u8]) -> Result<PathBuf, CliError> {
    let path = diagram_path(output_dir, focus);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| CliError::io(parent, err))?;
    }
    fs::write(&path, svg).map_err(|err| CliError::io(&path, err))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use lineage::semantic::{TypeKind, TypeNode};

    use super::*;

    fn args(focus: &[&str]) -> Args {
        Args {
            input: "types.toml".to_string(),
            focus: focus.iter().map(|name| name.to_string()).collect(),
            output: "diagrams".to_string(),
            config: None,
            jobs: 1,
            log_level: "info".to_string(),
        }
    }

    fn catalog() -> TypeCatalog {
        TypeCatalog::from_nodes([
            TypeNode::new("java.lang.Object", TypeKind::Class).with_included(false),
            TypeNode::new("geo.Shape", TypeKind::Class).with_superclass("java.lang.Object"),
        ])
    }

    #[test]
    fn test_diagram_path_follows_package() {
        let path = diagram_path(Path::new("out"), TypeId::new("geo.shapes.Circle"));
        assert_eq!(path, Path::new("out/geo/shapes/Circle.svg"));

        let path = diagram_path(Path::new("out"), TypeId::new("Main"));
        assert_eq!(path, Path::new("out/Main.svg"));
    }

    #[test]
    fn test_focus_defaults_to_included_types() {
        let focuses = focus_types(&args(&[]), &catalog()).expect("focuses");
        assert_eq!(focuses, vec![TypeId::new("geo.Shape")]);
    }

    #[test]
    fn test_unknown_focus() {
        let err = focus_types(&args(&["geo.Missing"]), &catalog()).unwrap_err();
        assert!(matches!(err, CliError::UnknownFocus(ref name) if name == "geo.Missing"));
    }

    #[test]
    fn test_parallel_render_keeps_order() {
        let catalog = TypeCatalog::from_nodes([
            TypeNode::new("java.lang.Object", TypeKind::Class),
            TypeNode::new("geo.Shape", TypeKind::Class).with_superclass("java.lang.Object"),
            TypeNode::new("geo.Circle", TypeKind::Class).with_superclass("geo.Shape"),
            TypeNode::new("geo.Broken", TypeKind::Class).with_superclass("vendor.Missing"),
        ]);
        let repository = TypeRepository::new();
        let focuses: Vec<TypeId> = catalog.ids().collect();

        let results = render_all(&DiagramBuilder::default(), &repository, &catalog, &focuses, 3)
            .expect("workers should not panic");

        assert_eq!(results.len(), 4);
        assert!(results[..3].iter().all(Result::is_ok));
        assert!(matches!(
            results[3],
            Err(CliError::Render { ref focus, .. }) if focus == "geo.Broken"
        ));
    }
}
