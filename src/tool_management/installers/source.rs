//! Source-repository installs: clone or update a repository under the
//! install directory, then build or link the tool from it.

use super::common::{InstallContext, InstallationUtils};
use crate::common::CommandSpec;
use crate::tool_management::detector::InstallationSource;
use crate::tool_management::registry::{PostClone, SourceRepo};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Install a tool from its source repository.
pub fn install_from_source(ctx: &InstallContext<'_>, tool_name: &str, repo: &SourceRepo) -> bool {
    info!("🔧 Installing {} from {}...", tool_name, repo.url);

    let Some(clone_dir) = sync_repository(ctx, repo) else {
        warn!("❌ Could not fetch {} for {}", repo.url, tool_name);
        return false;
    };

    if !run_post_clone(ctx, tool_name, &clone_dir, &repo.post_clone) {
        warn!("❌ Post-clone step failed for {} in {}", tool_name, clone_dir.display());
        return false;
    }

    verify_installation(ctx, tool_name);
    info!("✅ {} installed from source", tool_name);
    true
}

/// Clone `repo` into the install directory, or pull if a clone exists.
///
/// Returns the clone directory on success.
pub fn sync_repository(ctx: &InstallContext<'_>, repo: &SourceRepo) -> Option<PathBuf> {
    let clone_dir = ctx.paths.install_dir.join(&repo.dir_name);

    let command = if clone_dir.join(".git").exists() {
        info!("🔄 Updating existing clone at {}", clone_dir.display());
        CommandSpec::new("git")
            .arg("-C")
            .arg(clone_dir.to_string_lossy())
            .args(["pull", "--ff-only"])
    } else {
        if !InstallationUtils::ensure_dir_exists(&ctx.paths.install_dir) {
            return None;
        }
        CommandSpec::new("git")
            .args(["clone", "--depth", "1"])
            .arg(repo.url.as_str())
            .arg(clone_dir.to_string_lossy())
    };

    InstallationUtils::execute_command(ctx.runner, &command).then_some(clone_dir)
}

fn run_post_clone(
    ctx: &InstallContext<'_>,
    tool_name: &str,
    clone_dir: &Path,
    post_clone: &PostClone,
) -> bool {
    let bin_dir = &ctx.paths.bin_dir;

    match post_clone {
        PostClone::GoBuild { output } => {
            let build = CommandSpec::new("go")
                .args(["build", "-o", output.as_str(), "."])
                .current_dir(clone_dir);
            InstallationUtils::execute_command(ctx.runner, &build)
                && InstallationUtils::link_into_bin(&clone_dir.join(output), bin_dir, tool_name)
        }
        PostClone::Make { binary } => {
            let build = CommandSpec::new("make").current_dir(clone_dir);
            InstallationUtils::execute_command(ctx.runner, &build)
                && InstallationUtils::copy_into_bin(&clone_dir.join(binary), bin_dir, tool_name)
        }
        PostClone::ScriptLink { script } => {
            let script_path = clone_dir.join(script);
            if !script_path.exists() {
                warn!("❌ Expected script {} is missing", script_path.display());
                return false;
            }
            InstallationUtils::make_executable(&script_path)
                && InstallationUtils::link_into_bin(&script_path, bin_dir, tool_name)
        }
        PostClone::Generic => generic_setup(ctx, tool_name, clone_dir),
    }
}

/// Install Python requirements and run `setup.py` when the repository has them.
fn generic_setup(ctx: &InstallContext<'_>, tool_name: &str, clone_dir: &Path) -> bool {
    let mut ok = true;

    if clone_dir.join("requirements.txt").exists() {
        let deps = CommandSpec::new("pip3")
            .args(["install", "--user", "-r", "requirements.txt"])
            .current_dir(clone_dir);
        ok &= InstallationUtils::execute_command(ctx.runner, &deps);
    }

    if clone_dir.join("setup.py").exists() {
        let setup = CommandSpec::new("python3")
            .args(["setup.py", "install", "--user"])
            .current_dir(clone_dir);
        ok &= InstallationUtils::execute_command(ctx.runner, &setup);
    } else if clone_dir.join("pyproject.toml").exists() {
        let setup = CommandSpec::new("pip3")
            .args(["install", "--user", "."])
            .current_dir(clone_dir);
        ok &= InstallationUtils::execute_command(ctx.runner, &setup);
    }

    // Repositories that ship an entry script named after the tool.
    for candidate in [format!("{}.py", tool_name), tool_name.to_string()] {
        let script = clone_dir.join(&candidate);
        if script.is_file() {
            debug!("Linking entry script {}", script.display());
            ok &= InstallationUtils::make_executable(&script)
                && InstallationUtils::link_into_bin(&script, &ctx.paths.bin_dir, tool_name);
            break;
        }
    }

    ok
}

/// Re-check that the tool resolves; warn about PATH when it does not.
fn verify_installation(ctx: &InstallContext<'_>, tool_name: &str) {
    let status = ctx.detector.detect_tool(tool_name);
    match status.installation_source {
        InstallationSource::SystemPath => {
            debug!("{} resolves at {:?}", tool_name, status.path);
        }
        InstallationSource::UserLocal => {
            warn!(
                "💡 {} is installed but not on PATH; add {} to your PATH",
                tool_name,
                ctx.paths.bin_dir.display()
            );
        }
        InstallationSource::NotFound => {
            warn!(
                "💡 {} is still not resolvable; check {} and your PATH",
                tool_name,
                ctx.paths.bin_dir.display()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::process::fake::ScriptedRunner;
    use crate::config::types::{InstallPaths, PathsConfig};
    use crate::tool_management::detector::{ToolDetectionConfig, ToolDetector};
    use crate::tool_management::environment::Environment;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        env: Environment,
        paths: InstallPaths,
        detector: ToolDetector,
    }

    fn fixture() -> Fixture {
        let temp = TempDir::new().unwrap();
        let paths = InstallPaths::resolve(&PathsConfig::default(), temp.path(), None);
        let detector = ToolDetector::with_config(ToolDetectionConfig {
            search_path: Some(temp.path().join("empty-path").into_os_string()),
            extra_dirs: vec![paths.bin_dir.clone()],
        });
        Fixture {
            env: Environment::detect_from("linux", Some("ID=debian")).unwrap(),
            paths,
            detector,
            _temp: temp,
        }
    }

    /// Simulates `git clone` by creating the clone directory and `files` in it.
    fn cloning_runner(files: &'static [&'static str]) -> ScriptedRunner {
        ScriptedRunner::new().with_hook(move |spec| {
            if spec.program == "git" && spec.args.first().map(String::as_str) == Some("clone") {
                let dir = PathBuf::from(spec.args.last().unwrap());
                fs::create_dir_all(dir.join(".git")).unwrap();
                for file in files {
                    let path = dir.join(file);
                    fs::create_dir_all(path.parent().unwrap()).unwrap();
                    fs::write(path, "#!/bin/sh\n").unwrap();
                }
            }
        })
    }

    fn ctx<'a>(f: &'a Fixture, runner: &'a ScriptedRunner) -> InstallContext<'a> {
        InstallContext {
            env: &f.env,
            runner,
            detector: &f.detector,
            paths: &f.paths,
        }
    }

    fn script_repo() -> SourceRepo {
        SourceRepo::github(
            "drwetter",
            "testssl.sh",
            PostClone::ScriptLink {
                script: "testssl.sh".to_string(),
            },
        )
    }

    #[test]
    fn test_second_install_pulls_instead_of_cloning() {
        let f = fixture();
        let runner = cloning_runner(&["testssl.sh"]);
        let repo = script_repo();

        assert!(install_from_source(&ctx(&f, &runner), "testssl.sh", &repo));
        assert!(install_from_source(&ctx(&f, &runner), "testssl.sh", &repo));

        let git_calls: Vec<String> = runner
            .calls()
            .into_iter()
            .filter(|c| c.starts_with("git"))
            .collect();
        assert_eq!(git_calls.len(), 2);
        assert!(git_calls[0].starts_with("git clone --depth 1 https://github.com/drwetter/testssl.sh.git"));
        assert!(git_calls[1].contains("pull --ff-only"));

        let entries: Vec<_> = fs::read_dir(&f.paths.install_dir).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_script_link_lands_in_bin_dir() {
        let f = fixture();
        let runner = cloning_runner(&["testssl.sh"]);

        assert!(install_from_source(&ctx(&f, &runner), "testssl.sh", &script_repo()));
        let link = f.paths.bin_dir.join("testssl.sh");
        assert_eq!(
            fs::read_link(&link).unwrap(),
            f.paths.install_dir.join("testssl.sh").join("testssl.sh")
        );
        assert!(f.detector.is_available("testssl.sh"));
    }

    #[test]
    fn test_failed_clone_is_failure() {
        let f = fixture();
        let runner = ScriptedRunner::new().fail_on("git clone");

        assert!(!install_from_source(&ctx(&f, &runner), "testssl.sh", &script_repo()));
        assert_eq!(runner.calls().len(), 1);
    }

    #[test]
    fn test_go_build_failure_is_failure() {
        let f = fixture();
        let runner = cloning_runner(&[]).fail_on("go build");
        let repo = SourceRepo::github(
            "ropnop",
            "kerbrute",
            PostClone::GoBuild {
                output: "kerbrute".to_string(),
            },
        );

        assert!(!install_from_source(&ctx(&f, &runner), "kerbrute", &repo));
        let build = runner.specs().into_iter().find(|s| s.program == "go").unwrap();
        assert_eq!(build.cwd, Some(f.paths.install_dir.join("kerbrute")));
    }

    #[test]
    fn test_make_copies_binary() {
        let f = fixture();
        let runner = cloning_runner(&["bin/massdns"]);
        let repo = SourceRepo::github(
            "blechschmidt",
            "massdns",
            PostClone::Make {
                binary: "bin/massdns".to_string(),
            },
        );

        assert!(install_from_source(&ctx(&f, &runner), "massdns", &repo));
        assert!(f.paths.bin_dir.join("massdns").is_file());
        assert!(runner.calls().contains(&"make".to_string()));
    }

    #[test]
    fn test_generic_setup_runs_requirements_and_setup() {
        let f = fixture();
        let runner = cloning_runner(&["requirements.txt", "setup.py", "theHarvester.py"]);
        let repo = SourceRepo::github("laramies", "theHarvester", PostClone::Generic);

        assert!(install_from_source(&ctx(&f, &runner), "theHarvester", &repo));
        let calls = runner.calls();
        assert!(calls.contains(&"pip3 install --user -r requirements.txt".to_string()));
        assert!(calls.contains(&"python3 setup.py install --user".to_string()));
        assert!(f.paths.bin_dir.join("theHarvester").exists());
    }
}
