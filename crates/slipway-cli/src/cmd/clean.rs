use slipway_core::exec;
use slipway_core::marker::MarkerStore;
use slipway_core::tools::DockerCli;
use std::path::Path;

/// Remove stage markers and, best-effort, the locally built image the build
/// marker points at. Never fails on a missing docker or missing image.
pub fn run(root: &Path) -> anyhow::Result<()> {
    let markers = MarkerStore::new(root);
    if let Ok(Some(marker)) = markers.load_build() {
        if exec::require("docker").is_ok() {
            if let Err(e) = DockerCli.remove_image(&marker.local_image_ref) {
                tracing::debug!(error = %e, "could not remove local image");
            }
        }
    }
    markers.clean()?;
    println!("removed stage markers");
    Ok(())
}
