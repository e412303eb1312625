use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

/// A scripted cluster server for one test, killed on drop.
pub struct SimGuard {
    pub base_url: String,
    ctl: reqwest::blocking::Client,
    _dir: tempfile::TempDir,
    child: Child,
}

impl Drop for SimGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub fn spawn_sim() -> Result<SimGuard> {
    let dir = tempfile::tempdir().context("create sim tempdir")?;
    let addr_file = dir.path().join("addr.txt");

    let child = Command::new(env!("CARGO_BIN_EXE_clusterdash-sim"))
        .args([
            "--addr",
            "127.0.0.1:0",
            "--addr-file",
            addr_file.to_str().unwrap(),
        ])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("spawn clusterdash-sim")?;

    let base_url = read_addr_file(&addr_file)?;
    wait_for_healthz(&base_url)?;

    Ok(SimGuard {
        base_url,
        ctl: reqwest::blocking::Client::new(),
        _dir: dir,
        child,
    })
}

fn read_addr_file(addr_file: &std::path::Path) -> Result<String> {
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("addr file not written at {}", addr_file.display());
        }

        if let Ok(s) = std::fs::read_to_string(addr_file) {
            let s = s.trim();
            if !s.is_empty() {
                return Ok(format!("http://{}", s));
            }
        }
        thread::sleep(Duration::from_millis(10));
    }
}

fn wait_for_healthz(base_url: &str) -> Result<()> {
    let client = reqwest::blocking::Client::new();
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("sim did not become healthy at {}/healthz", base_url);
        }
        match client.get(format!("{}/healthz", base_url)).send() {
            Ok(resp) if resp.status().is_success() => return Ok(()),
            _ => thread::sleep(Duration::from_millis(50)),
        }
    }
}

impl SimGuard {
    /// Replace snapshot halves via `POST /ctl/state`. Absent fields keep
    /// their current value; `"current": null` sets the cluster idle.
    pub fn patch_state(&self, patch: serde_json::Value) -> Result<()> {
        let resp = self
            .ctl
            .post(format!("{}/ctl/state", self.base_url))
            .json(&patch)
            .send()
            .context("post /ctl/state")?;
        anyhow::ensure!(resp.status().is_success(), "ctl/state: {}", resp.status());
        Ok(())
    }

    /// Make a resource answer with an error envelope until cleared. An empty
    /// message produces an envelope without `msg`.
    pub fn fail(&self, resource: &str, msg: &str) -> Result<()> {
        let resp = self
            .ctl
            .post(format!("{}/ctl/fail/{}", self.base_url, resource))
            .body(msg.to_string())
            .send()
            .context("post /ctl/fail")?;
        anyhow::ensure!(resp.status().is_success(), "ctl/fail: {}", resp.status());
        Ok(())
    }

    #[allow(dead_code)]
    pub fn clear_fail(&self, resource: &str) -> Result<()> {
        let resp = self
            .ctl
            .post(format!("{}/ctl/clear-fail/{}", self.base_url, resource))
            .send()
            .context("post /ctl/clear-fail")?;
        anyhow::ensure!(
            resp.status().is_success(),
            "ctl/clear-fail: {}",
            resp.status()
        );
        Ok(())
    }

    /// Toggle non-JSON bodies for a resource.
    #[allow(dead_code)]
    pub fn garbage(&self, resource: &str) -> Result<()> {
        let resp = self
            .ctl
            .post(format!("{}/ctl/garbage/{}", self.base_url, resource))
            .send()
            .context("post /ctl/garbage")?;
        anyhow::ensure!(resp.status().is_success(), "ctl/garbage: {}", resp.status());
        Ok(())
    }

    /// Record a finished log URL for one host of one invocation.
    #[allow(dead_code)]
    pub fn set_log(&self, id: &str, hostname: &str, url: &str) -> Result<()> {
        let resp = self
            .ctl
            .post(format!("{}/ctl/logs/{}/{}", self.base_url, id, hostname))
            .body(url.to_string())
            .send()
            .context("post /ctl/logs")?;
        anyhow::ensure!(resp.status().is_success(), "ctl/logs: {}", resp.status());
        Ok(())
    }
}

/// A full invocation record the sim will accept in a state patch.
#[allow(dead_code)]
pub fn invocation_json(id: &str, name: &str, hostnames: &[&str]) -> serde_json::Value {
    let hosts: serde_json::Map<String, serde_json::Value> = hostnames
        .iter()
        .map(|hostname| {
            (
                hostname.to_string(),
                serde_json::json!({ "command": null, "args": [] }),
            )
        })
        .collect();
    serde_json::json!({
        "id": id,
        "name": name,
        "url": format!("https://example.com/{}", name),
        "commit": "0123456789abcdef0123456789abcdef01234567",
        "start": "2026-08-30T10:00:00Z",
        "descriptor": {
            "name": name,
            "command": null,
            "args": [],
            "hosts": hosts,
            "gen_logs": false,
            "log_dir": "logs/"
        },
        "logs": {}
    })
}

#[allow(dead_code)]
pub fn host_json(id: &str, hostname: &str, desc: &str, bound: Option<&str>) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "hostname": hostname,
        "state": { "desc": desc, "id": bound }
    })
}
