use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn command_types() -> anyhow::Result<()> {
    let input = "\
##gff-version 3
chr1\t.\tgene\t1\t10\t.\t+\t.\tID=g1
chr1\t.\tmRNA\t1\t10\t.\t+\t.\tID=m1;Parent=g1
chr1\t.\texon\t1\t5\t.\t+\t.\tParent=m1
chr1\t.\texon\t7\t10\t.\t+\t.\tParent=m1
";
    let mut cmd = Command::cargo_bin("featmerge")?;
    let output = cmd
        .arg("types")
        .arg("stdin")
        .write_stdin(input)
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();

    assert_eq!(stdout, "exon\t2\ngene\t1\nmRNA\t1\n");

    Ok(())
}

#[test]
fn command_types_duplicate_ids() -> anyhow::Result<()> {
    let input = "\
chr1\t.\tgene\t1\t10\t.\t+\t.\tID=g1
chr1\t.\tgene\t20\t30\t.\t+\t.\tID=g1
";
    let mut cmd = Command::cargo_bin("featmerge")?;
    cmd.arg("types").arg("stdin").write_stdin(input);
    cmd.assert().success().stdout(predicate::eq("gene\t2\n"));

    Ok(())
}

#[test]
fn command_types_fasta_section() -> anyhow::Result<()> {
    let input = "\
chr1\t.\tgene\t1\t10\t.\t+\t.\tID=g1
##FASTA
>chr1
ACGTACGTAC
";
    let mut cmd = Command::cargo_bin("featmerge")?;
    cmd.arg("types").arg("stdin").write_stdin(input);
    cmd.assert().success().stdout(predicate::eq("gene\t1\n"));

    Ok(())
}

#[test]
fn command_types_missing_file() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("featmerge")?;
    cmd.arg("types").arg("tests/no_such_file.gff");
    cmd.assert().failure();

    Ok(())
}
