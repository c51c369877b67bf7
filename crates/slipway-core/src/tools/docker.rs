use std::path::Path;

use crate::error::Result;
use crate::exec;
use crate::tools::ImageBuilder;

const DOCKER: &str = "docker";

/// Local docker daemon: builds, tags, pushes, and runs images.
pub struct DockerCli;

impl DockerCli {
    pub fn tag(&self, source: &str, target: &str) -> Result<()> {
        exec::run_streamed(&mut exec::command(DOCKER, &["tag", source, target])?, DOCKER)
    }

    pub fn push(&self, image_ref: &str) -> Result<()> {
        exec::run_streamed(&mut exec::command(DOCKER, &["push", image_ref])?, DOCKER)
    }

    /// `docker login` with the password on stdin so it never hits argv.
    pub fn login(&self, host: &str, username: &str, password: &str) -> Result<()> {
        let mut cmd = exec::command(
            DOCKER,
            &["login", "--username", username, "--password-stdin", host],
        )?;
        exec::run_with_stdin(&mut cmd, DOCKER, password)
    }

    pub fn run_detached(&self, name: &str, image_ref: &str, port: u16) -> Result<()> {
        let publish = format!("{port}:{port}");
        let mut cmd = exec::command(
            DOCKER,
            &["run", "--rm", "-d", "--name", name, "-p", &publish, image_ref],
        )?;
        exec::run_streamed(&mut cmd, DOCKER)
    }

    pub fn stop(&self, name: &str) -> Result<()> {
        exec::run_streamed(&mut exec::command(DOCKER, &["stop", name])?, DOCKER)
    }

    /// Remove a local image; missing images are not an error.
    pub fn remove_image(&self, image_ref: &str) -> Result<()> {
        exec::probe(&mut exec::command(DOCKER, &["rmi", image_ref])?, DOCKER)?;
        Ok(())
    }
}

impl ImageBuilder for DockerCli {
    fn build(&self, root: &Path, local_ref: &str, version: u64) -> Result<()> {
        let version_arg = format!("VERSION={version}");
        let mut cmd = exec::command(
            DOCKER,
            &["build", "-t", local_ref, "--build-arg", &version_arg, "."],
        )?;
        cmd.current_dir(root);
        exec::run_streamed(&mut cmd, DOCKER)
    }
}
