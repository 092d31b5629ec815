//! # Artifact Provisioner
//!
//! Copies the genesis inputs into the service's shared directory and reports
//! where the service will see them.

use std::path::Path;

use tracing::debug;

use crate::domain::{GenesisArtifacts, LauncherError, ProvisionedArtifacts, SharedDirectory};

/// Relative path of the genesis config inside the shared directory.
pub const GENESIS_CONFIG_YML_REL_PATH: &str = "genesis-config.yml";
/// Relative path of the genesis state inside the shared directory.
pub const GENESIS_SSZ_REL_PATH: &str = "genesis.ssz";

/// Copies genesis artifacts into a shared directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactProvisioner {
    genesis: GenesisArtifacts,
}

impl ArtifactProvisioner {
    /// Provisioner for the given local artifacts.
    pub fn new(genesis: GenesisArtifacts) -> Self {
        Self { genesis }
    }

    /// Copy both artifacts and return their service-side paths.
    ///
    /// # Errors
    ///
    /// [`LauncherError::Provisioning`] naming the artifact and both paths.
    pub fn provision(
        &self,
        shared_dir: &SharedDirectory,
    ) -> Result<ProvisionedArtifacts, LauncherError> {
        let genesis_config_yml = copy_artifact(
            "genesis config YML",
            &self.genesis.config_yml,
            shared_dir,
            GENESIS_CONFIG_YML_REL_PATH,
        )?;
        let genesis_state_ssz = copy_artifact(
            "genesis SSZ",
            &self.genesis.state_ssz,
            shared_dir,
            GENESIS_SSZ_REL_PATH,
        )?;

        Ok(ProvisionedArtifacts {
            genesis_config_yml,
            genesis_state_ssz,
        })
    }
}

fn copy_artifact(
    artifact: &'static str,
    source_path: &Path,
    shared_dir: &SharedDirectory,
    rel_path: &str,
) -> Result<std::path::PathBuf, LauncherError> {
    let shared_path = shared_dir.child_path(rel_path);
    shared_path
        .copy_from(source_path)
        .map_err(|source| LauncherError::Provisioning {
            artifact,
            source_path: source_path.to_path_buf(),
            destination: shared_path.abs_path_on_launcher().to_path_buf(),
            source,
        })?;

    debug!(
        artifact,
        from = %source_path.display(),
        to = %shared_path.abs_path_on_launcher().display(),
        "provisioned artifact"
    );
    Ok(shared_path.abs_path_on_service().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn write_genesis(dir: &Path) -> GenesisArtifacts {
        let config = dir.join("static/genesis-config.yml");
        let ssz = dir.join("static/genesis.ssz");
        fs::create_dir_all(dir.join("static")).unwrap();
        fs::write(&config, b"PRESET_BASE: minimal\n").unwrap();
        fs::write(&ssz, [0u8, 1, 2, 3]).unwrap();
        GenesisArtifacts::new(config, ssz)
    }

    #[test]
    fn test_provision_copies_both_artifacts() {
        let tmp = tempfile::tempdir().unwrap();
        let genesis = write_genesis(tmp.path());
        let shared = SharedDirectory::new(tmp.path().join("shared/cl-client-0"), "/shared");

        let provisioned = ArtifactProvisioner::new(genesis).provision(&shared).unwrap();

        assert_eq!(provisioned.genesis_config_yml, PathBuf::from("/shared/genesis-config.yml"));
        assert_eq!(provisioned.genesis_state_ssz, PathBuf::from("/shared/genesis.ssz"));
        assert_eq!(
            fs::read(tmp.path().join("shared/cl-client-0/genesis.ssz")).unwrap(),
            vec![0u8, 1, 2, 3]
        );
    }

    #[test]
    fn test_missing_state_reports_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let mut genesis = write_genesis(tmp.path());
        genesis.state_ssz = tmp.path().join("static/missing.ssz");
        let shared = SharedDirectory::new(tmp.path().join("shared"), "/shared");

        let err = ArtifactProvisioner::new(genesis).provision(&shared).unwrap_err();

        match err {
            LauncherError::Provisioning {
                artifact,
                source_path,
                destination,
                ..
            } => {
                assert_eq!(artifact, "genesis SSZ");
                assert!(source_path.ends_with("missing.ssz"));
                assert_eq!(destination, tmp.path().join("shared/genesis.ssz"));
            }
            other => panic!("expected provisioning error, got {other:?}"),
        }
    }
}
