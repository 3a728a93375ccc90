use std::path::Path;

use anyhow::Result;
use predicates::str::contains;
use pretty_assertions::assert_eq;
use serde_json::Value as JsonValue;
use tempfile::TempDir;

fn avalia(data_dir: &Path, user: Option<&str>) -> Result<assert_cmd::Command> {
    let mut cmd = assert_cmd::Command::cargo_bin("avalia")?;
    cmd.env_remove("AVALIA_USER")
        .arg("--no-color")
        .arg("--data-dir")
        .arg(data_dir);
    if let Some(user) = user {
        cmd.args(["--as", user]);
    }
    Ok(cmd)
}

fn with_admins(data_dir: &Path, admins: &[&str]) -> Result<()> {
    let list = admins
        .iter()
        .map(|admin| format!("{:?}", admin))
        .collect::<Vec<_>>()
        .join(", ");
    std::fs::write(
        data_dir.join("config.toml"),
        format!("[moderation]\nadmins = [{}]\n", list),
    )?;
    Ok(())
}

#[test]
fn post_reply_and_show_thread() -> Result<()> {
    let home = TempDir::new()?;

    avalia(home.path(), Some("ana@unb.br"))?
        .args(["post", "--discipline", "CIC0004", "Ótima disciplina"])
        .assert()
        .success()
        .stdout(contains("Posted comment #1"));

    avalia(home.path(), Some("bia@unb.br"))?
        .args(["reply", "1", "Concordo"])
        .assert()
        .success()
        .stdout(contains("Posted reply #2 to #1"));

    let output = avalia(home.path(), Some("bia@unb.br"))?
        .args(["show", "1", "--json"])
        .output()?;
    assert!(output.status.success());
    let thread: JsonValue = serde_json::from_slice(&output.stdout)?;
    assert_eq!(thread["reply_count"], 1);
    assert_eq!(thread["is_owner"], false);
    assert_eq!(thread["replies"][0]["is_owner"], true);
    assert_eq!(thread["replies"][0]["comment"]["text"], "Concordo");

    avalia(home.path(), None)?
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(contains("CIC0004"))
        .stdout(contains("Ótima disciplina"));

    Ok(())
}

#[test]
fn posting_requires_a_user() -> Result<()> {
    let home = TempDir::new()?;

    avalia(home.path(), None)?
        .args(["post", "--discipline", "CIC0004", "oi"])
        .assert()
        .failure()
        .stderr(contains("--as"));

    Ok(())
}

#[test]
fn vote_twice_withdraws() -> Result<()> {
    let home = TempDir::new()?;

    avalia(home.path(), Some("ana@unb.br"))?
        .args(["post", "--discipline", "CIC0004", "Boa aula"])
        .assert()
        .success();

    avalia(home.path(), Some("bia@unb.br"))?
        .args(["vote", "1", "up"])
        .assert()
        .success()
        .stdout(contains("Vote recorded on #1: ▲1 ▼0"));

    avalia(home.path(), Some("bia@unb.br"))?
        .args(["vote", "1", "up"])
        .assert()
        .success()
        .stdout(contains("Vote withdrawn on #1: ▲0 ▼0"));

    Ok(())
}

#[test]
fn others_cannot_delete() -> Result<()> {
    let home = TempDir::new()?;

    avalia(home.path(), Some("ana@unb.br"))?
        .args(["post", "--discipline", "CIC0004", "Meu comentário"])
        .assert()
        .success();

    avalia(home.path(), Some("bia@unb.br"))?
        .args(["delete", "1", "--yes"])
        .assert()
        .failure()
        .stderr(contains("Forbidden"));

    avalia(home.path(), Some("ana@unb.br"))?
        .args(["delete", "1", "--yes"])
        .assert()
        .success()
        .stdout(contains("Deleted comment #1"));

    Ok(())
}

#[test]
fn moderation_flow() -> Result<()> {
    let home = TempDir::new()?;
    with_admins(home.path(), &["admin@unb.br"])?;

    avalia(home.path(), Some("ana@unb.br"))?
        .args(["post", "--discipline", "CIC0004", "Professor idiota"])
        .assert()
        .success()
        .stdout(contains("Flagged for moderator review"));

    for user in ["b@unb.br", "c@unb.br", "d@unb.br"] {
        avalia(home.path(), Some(user))?
            .args(["report", "1"])
            .assert()
            .success();
    }

    let output = avalia(home.path(), Some("admin@unb.br"))?
        .args(["admin", "stats", "--json"])
        .output()?;
    assert!(output.status.success());
    let stats: JsonValue = serde_json::from_slice(&output.stdout)?;
    assert_eq!(stats["total"], 1);
    assert_eq!(stats["alarming"], 1);
    assert_eq!(stats["reported"], 1);

    avalia(home.path(), Some("admin@unb.br"))?
        .args(["admin", "mark-safe", "1"])
        .assert()
        .success();

    avalia(home.path(), Some("admin@unb.br"))?
        .args(["admin", "ban", "1", "--reason", "ofensas"])
        .assert()
        .success()
        .stdout(contains("Banned ana@unb.br"));

    avalia(home.path(), Some("ana@unb.br"))?
        .args(["post", "--discipline", "CIC0004", "de novo"])
        .assert()
        .failure()
        .stderr(contains("banned"));

    let output = avalia(home.path(), Some("admin@unb.br"))?
        .args(["admin", "alarming", "--json"])
        .output()?;
    let page: JsonValue = serde_json::from_slice(&output.stdout)?;
    assert_eq!(page["total_elements"], 0);

    Ok(())
}

#[test]
fn admin_commands_need_an_admin() -> Result<()> {
    let home = TempDir::new()?;
    with_admins(home.path(), &["admin@unb.br"])?;

    avalia(home.path(), Some("ana@unb.br"))?
        .args(["post", "--discipline", "CIC0004", "Meu comentário"])
        .assert()
        .success();

    avalia(home.path(), Some("bia@unb.br"))?
        .args(["admin", "ban", "1"])
        .assert()
        .failure()
        .stderr(contains("not an admin"));

    avalia(home.path(), Some("bia@unb.br"))?
        .args(["admin", "delete", "1", "--yes"])
        .assert()
        .failure()
        .stderr(contains("not an admin"));

    avalia(home.path(), Some("bia@unb.br"))?
        .args(["admin", "stats"])
        .assert()
        .failure();

    avalia(home.path(), Some("ana@unb.br"))?
        .args(["post", "--discipline", "CIC0004", "Ainda posso postar"])
        .assert()
        .success()
        .stdout(contains("Posted comment #2"));

    Ok(())
}

#[test]
fn admin_may_delete_any_comment() -> Result<()> {
    let home = TempDir::new()?;
    with_admins(home.path(), &["admin@unb.br"])?;

    avalia(home.path(), Some("ana@unb.br"))?
        .args(["post", "--discipline", "CIC0004", "Primeiro"])
        .assert()
        .success();
    avalia(home.path(), Some("ana@unb.br"))?
        .args(["post", "--discipline", "CIC0004", "Segundo"])
        .assert()
        .success();

    avalia(home.path(), Some("admin@unb.br"))?
        .args(["delete", "1", "--yes"])
        .assert()
        .success()
        .stdout(contains("Deleted comment #1"));

    avalia(home.path(), Some("admin@unb.br"))?
        .args(["admin", "delete", "2", "--yes"])
        .assert()
        .success()
        .stdout(contains("Deleted comment #2"));

    let output = avalia(home.path(), Some("admin@unb.br"))?
        .args(["admin", "stats", "--json"])
        .output()?;
    let stats: JsonValue = serde_json::from_slice(&output.stdout)?;
    assert_eq!(stats["total"], 0);

    Ok(())
}

#[test]
fn config_init_and_validate() -> Result<()> {
    let home = TempDir::new()?;

    avalia(home.path(), None)?
        .args(["config", "init", "--force"])
        .assert()
        .success();
    assert!(home.path().join("config.toml").exists());

    avalia(home.path(), None)?
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(contains("Configuration is valid"));

    Ok(())
}
