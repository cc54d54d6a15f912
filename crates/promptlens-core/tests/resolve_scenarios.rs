mod common;

use common::{as_strs, row, Fixture};
use promptlens_core::model::{ImageId, Model, ModelPanel, Strategy, StrategyOutput};
use promptlens_core::{load_data, resolve, LensError};

#[test]
fn test_end_to_end_gemini_only() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let fx = Fixture::new(dir.path());
    fx.metadata(&[("7", "cat.png")]);
    fx.responses(
        "Gemini",
        &[[
            "7", "T", "B", "Zt", "Zb", "Zc", "Ft", "Fb", "Fc", "Ct", "Cb", "Cc",
        ]],
    );

    let ds = load_data(&fx.config())?;
    let rec = resolve(&ImageId::new("7"), &ds)?;

    assert_eq!(rec.image_path, dir.path().join("images").join("cat.png"));
    assert_eq!(rec.original.title, "T");
    assert_eq!(rec.original.body, "B");
    assert_eq!(
        rec.output(Model::Gemini, Strategy::ZeroShot),
        Some(&StrategyOutput {
            title: "Zt".into(),
            body: "Zb".into(),
            combined: "Zc".into()
        })
    );
    assert_eq!(
        rec.output(Model::Gemini, Strategy::ChainOfThought).map(|o| o.combined.as_str()),
        Some("Cc")
    );
    assert_eq!(rec.panel(Model::Gpt4), &ModelPanel::Unavailable);
    assert_eq!(rec.panel(Model::Llama), &ModelPanel::Unavailable);
    for s in Strategy::ALL {
        assert!(rec.output(Model::Gpt4, s).is_none());
        assert!(rec.output(Model::Llama, s).is_none());
    }
    Ok(())
}

#[test]
fn test_missing_gemini_row_is_an_error_not_blank() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let fx = Fixture::new(dir.path());
    fx.metadata(&[("9", "dog.png")]);
    fx.responses("GPT-4o", &[as_strs(&row("9", "gpt"))]);

    let ds = load_data(&fx.config())?;
    let err = resolve(&ImageId::new("9"), &ds).unwrap_err();
    assert!(matches!(err, LensError::OriginalContentMissing(ref id) if id.as_str() == "9"));
    Ok(())
}

#[test]
fn test_unknown_id_is_record_not_found() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let fx = Fixture::new(dir.path());
    fx.metadata(&[("1", "a.png")]);
    fx.responses("Gemini", &[as_strs(&row("1", "gem"))]);

    let ds = load_data(&fx.config())?;
    let err = resolve(&ImageId::new("2"), &ds).unwrap_err();
    assert!(matches!(err, LensError::RecordNotFound(_)));
    assert!(!err.is_fatal());
    Ok(())
}

#[test]
fn test_models_resolve_independently() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let fx = Fixture::new(dir.path());
    fx.metadata(&[("1", "a.png"), ("2", "b.png")]);
    fx.responses(
        "Gemini",
        &[as_strs(&row("1", "gem")), as_strs(&row("2", "gem"))],
    );
    fx.responses("GPT-4o", &[as_strs(&row("2", "gpt"))]);
    fx.responses("llama-3.2", &[as_strs(&row("1", "llama"))]);

    let ds = load_data(&fx.config())?;

    let one = resolve(&ImageId::new("1"), &ds)?;
    assert!(one.panel(Model::Gemini).is_available());
    assert!(!one.panel(Model::Gpt4).is_available());
    assert_eq!(
        one.output(Model::Llama, Strategy::FewShot).map(|o| o.body.as_str()),
        Some("llama-fb")
    );

    let two = resolve(&ImageId::new("2"), &ds)?;
    assert!(!two.panel(Model::Llama).is_available());
    assert_eq!(
        two.output(Model::Gpt4, Strategy::ZeroShot).map(|o| o.title.as_str()),
        Some("gpt-zt")
    );
    Ok(())
}

#[test]
fn test_duplicate_ids_first_row_wins_consistently() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let fx = Fixture::new(dir.path());
    fx.metadata(&[("5", "first.png"), ("5", "second.png")]);
    fx.responses(
        "Gemini",
        &[as_strs(&row("5", "one")), as_strs(&row("5", "two"))],
    );

    let ds = load_data(&fx.config())?;
    let id = ImageId::new("5");
    let a = resolve(&id, &ds)?;
    let b = resolve(&id, &ds)?;

    assert_eq!(a, b);
    assert!(a.image_path.ends_with("first.png"));
    assert_eq!(a.original.title, "one-Title");
    assert_eq!(
        a.output(Model::Gemini, Strategy::ChainOfThought).map(|o| o.title.as_str()),
        Some("one-ct")
    );
    Ok(())
}

#[test]
fn test_text_is_verbatim() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let fx = Fixture::new(dir.path());
    fx.metadata(&[("3", "x.png")]);
    fx.responses(
        "Gemini",
        &[[
            "3",
            "  Padded, title  ",
            "line one\nline \"two\"",
            "", "", "", "", "", "", "", "", "",
        ]],
    );

    let ds = load_data(&fx.config())?;
    let rec = resolve(&ImageId::new("3"), &ds)?;
    assert_eq!(rec.original.title, "  Padded, title  ");
    assert_eq!(rec.original.body, "line one\nline \"two\"");
    assert_eq!(
        rec.output(Model::Gemini, Strategy::ZeroShot).map(|o| o.combined.as_str()),
        Some("")
    );
    Ok(())
}

#[test]
fn test_numeric_id_spellings_join() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let fx = Fixture::new(dir.path());
    fx.metadata(&[("12", "n.png")]);
    fx.responses("Gemini", &[as_strs(&row("12.0", "gem"))]);

    let ds = load_data(&fx.config())?;
    let rec = resolve(&ImageId::new("012"), &ds)?;
    assert_eq!(rec.id.as_str(), "12");
    assert_eq!(rec.original.body, "gem-Body");
    Ok(())
}
