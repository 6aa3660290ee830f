mod common;

use agenda_builder::{
    AgendaRequest, Delivery, DeliveryMode, PipelineError, ResolvedLogo, StripOutcome,
};
use chrono::Timelike;
use common::docx_assertions::table_cell_counts;
use common::fixtures::*;
use common::{GeneratedDocx, TestResult, Workspace};
use serde_json::json;
use std::fs;

#[test]
fn test_end_to_end_generates_named_document() -> TestResult {
    let workspace = Workspace::new();
    let pipeline = workspace.pipeline();

    let agenda = pipeline.generate_from_json(&sample_record().to_string())?;

    let expected = workspace
        .path()
        .join("output")
        .join("2024-01-01-Acme-KickoffAgenda.docx");
    assert_eq!(agenda.path, expected);
    assert_eq!(agenda.attachment_name, "2024-01-01-AcmeAgenda.docx");
    assert_eq!(agenda.logo, ResolvedLogo::Absent);
    assert!(!agenda.logo_dropped);
    assert_eq!(agenda.delivery, Delivery::File);
    assert_eq!(
        agenda.table,
        Some(StripOutcome::Stripped {
            table_index: 1,
            rows: 3
        })
    );

    let docx = GeneratedDocx::open(&agenda.path)?;
    for text in ["Kickoff", "Acme", "2024-01-01", "Alice Smith", "Carol White", "Architecture"] {
        assert_docx_contains_text!(docx, text);
    }
    assert_docx_not_contains_text!(docx, "{{");
    assert_docx_not_contains_text!(docx, "\u{2022}");
    Ok(())
}

#[test]
fn test_single_item_record_without_logo() -> TestResult {
    let workspace = Workspace::new();
    let json = r#"{"customer":"Acme","date":"2024-01-01","title":"Kickoff","summary":"S","primaries":[{"name":"A","role":"R"}],"supporting":[],"agenda_items":[{"time":"9:00","owner":"A","topic":"T","description":"D"}]}"#;

    let agenda = workspace.pipeline().generate_from_json(json)?;

    assert_eq!(
        agenda.path.file_name().and_then(|n| n.to_str()),
        Some("2024-01-01-Acme-KickoffAgenda.docx")
    );
    assert!(fs::metadata(&agenda.path)?.len() > 0);
    assert_eq!(agenda.logo, ResolvedLogo::Absent);

    let docx = GeneratedDocx::open(&agenda.path)?;
    let xml = docx.document_xml();
    assert_eq!(table_cell_counts(&xml, 1), vec![3, 3]);
    assert!(!xml.contains("<w:drawing>"));
    assert!(!docx.has_part("word/media/logo1.png"));
    assert_docx_contains_text!(docx, "9:00");
    Ok(())
}

#[test]
fn test_lists_keep_input_order() -> TestResult {
    let workspace = Workspace::new();
    let agenda = workspace
        .pipeline()
        .generate_from_json(&sample_record().to_string())?;

    let text = common::docx_assertions::extract_text(&GeneratedDocx::open(&agenda.path)?.document_xml());
    let bob = text.find("Bob Jones").ok_or("missing Bob")?;
    let carol = text.find("Carol White").ok_or("missing Carol")?;
    let intro = text.find("Introductions").ok_or("missing first item")?;
    let design = text.find("Architecture").ok_or("missing second item")?;
    assert!(bob < carol);
    assert!(intro < design);
    Ok(())
}

#[test]
fn test_missing_fields_render_blank() -> TestResult {
    let workspace = Workspace::new();
    let agenda = workspace.pipeline().generate_from_json("{}")?;

    assert!(agenda.path.ends_with("DATE-CUST-TOPICAgenda.docx"));
    assert_eq!(agenda.attachment_name, "DATE-CustomerAgenda.docx");
    let docx = GeneratedDocx::open(&agenda.path)?;
    assert_docx_not_contains_text!(docx, "{{");
    Ok(())
}

#[test]
fn test_values_are_escaped() -> TestResult {
    let workspace = Workspace::new();
    let json = record_with(json!({ "customer": "Smith & Sons <Ltd>" }));
    let agenda = workspace.pipeline().generate_from_json(&json)?;

    let docx = GeneratedDocx::open(&agenda.path)?;
    assert!(docx.document_xml().contains("Smith &amp; Sons &lt;Ltd&gt;"));
    assert_eq!(agenda.attachment_name, "2024-01-01-Smith _ Sons _Ltd_Agenda.docx");
    Ok(())
}

#[test]
fn test_invalid_input_is_rejected_before_rendering() {
    let workspace = Workspace::new();
    let pipeline = workspace.pipeline();

    let err = pipeline.generate_from_json("not json").unwrap_err();
    assert!(err.is_client_error());

    let incomplete = record_with(json!({ "primaries": [{ "name": "Alice" }] }));
    let err = pipeline.generate_from_json(&incomplete).unwrap_err();
    assert!(matches!(err, PipelineError::InvalidInput(_)));
    assert!(!workspace.path().join("output").exists());
}

#[test]
fn test_missing_template_fails_without_output() {
    let workspace = Workspace::new();
    let mut config = workspace.config();
    config.template_path = Some("missing.docx".into());
    let pipeline = workspace.pipeline_with(config).unwrap();

    let err = pipeline
        .generate_from_json(&sample_record().to_string())
        .unwrap_err();
    assert!(matches!(err, PipelineError::TemplateNotFound(path) if path.ends_with("missing.docx")));
    assert!(!workspace.path().join("output").exists());
}

#[test]
fn test_unknown_placeholder_fails_without_output() {
    let workspace = Workspace::new();
    let template = workspace.path().join("venue.docx");
    template_with_body("<w:p><w:r><w:t>{{venue}}</w:t></w:r></w:p>").save(&template).unwrap();

    let mut config = workspace.config();
    config.template_path = Some(template);
    let pipeline = workspace.pipeline_with(config).unwrap();

    let output = workspace.path().join("out.docx");
    let request = AgendaRequest::from_json(&sample_record().to_string())
        .unwrap()
        .with_output_path(&output);
    let err = pipeline.generate(request).unwrap_err();
    assert!(matches!(err, PipelineError::Render(_)), "{err}");
    assert!(!err.is_client_error());
    assert!(!output.exists());
}

#[test]
fn test_split_placeholders_render() -> TestResult {
    let workspace = Workspace::new();
    let template = workspace.path().join("split.docx");
    template_with_body(concat!(
        "<w:p><w:r><w:t>{{cust</w:t></w:r>",
        r#"<w:proofErr w:type="spellStart"/>"#,
        "<w:r><w:rPr><w:b/></w:rPr><w:t>omer}} on {</w:t></w:r><w:r><w:t>{date}}</w:t></w:r></w:p>"
    ))
    .save(&template)?;

    let mut config = workspace.config();
    config.template_path = Some(template);
    let agenda = workspace.pipeline_with(config)?.generate_from_json(&sample_record().to_string())?;

    let docx = GeneratedDocx::open(&agenda.path)?;
    assert_docx_contains_text!(docx, "Acme on 2024-01-01");
    assert_eq!(agenda.table, Some(StripOutcome::NoQualifyingTable));
    Ok(())
}

#[test]
fn test_pinned_output_path_is_overwritten() -> TestResult {
    let workspace = Workspace::new();
    let output = workspace.write_file("nested/dir/agenda.docx", b"stale");

    let request = AgendaRequest::from_json(&sample_record().to_string())?.with_output_path(&output);
    let agenda = workspace.pipeline().generate(request)?;

    assert_eq!(agenda.path, output);
    assert_docx_contains_text!(GeneratedDocx::open(&output)?, "Kickoff");
    Ok(())
}

#[test]
fn test_unique_output_names() -> TestResult {
    let workspace = Workspace::new();
    let mut config = workspace.config();
    config.unique_output_names = true;
    let pipeline = workspace.pipeline_with(config)?;

    let first = pipeline.generate_from_json(&sample_record().to_string())?;
    let second = pipeline.generate_from_json(&sample_record().to_string())?;

    assert_ne!(first.path, second.path);
    for agenda in [&first, &second] {
        let name = agenda.path.file_name().ok_or("no file name")?.to_string_lossy();
        assert!(name.starts_with("agenda_") && name.ends_with(".docx"), "{name}");
        assert_eq!(agenda.attachment_name, "2024-01-01-AcmeAgenda.docx");
    }
    Ok(())
}

#[test]
fn test_blob_delivery_returns_expiring_link() -> TestResult {
    let workspace = Workspace::new();
    let mut config = workspace.config();
    config.delivery = DeliveryMode::Blob;
    config.storage.base_url = Some("https://files.example.com/agendas".into());
    let pipeline = workspace.pipeline_with(config)?;

    let agenda = pipeline.generate_from_json(&sample_record().to_string())?;
    let link = agenda.link().ok_or("expected a link")?;

    assert_eq!(
        link.url.split('?').next(),
        Some("https://files.example.com/agendas/2024-01-01-Acme-KickoffAgenda.docx")
    );
    assert_eq!((link.expires_at.hour(), link.expires_at.minute()), (23, 59));
    let stored = workspace
        .path()
        .join("storage")
        .join("2024-01-01-Acme-KickoffAgenda.docx");
    assert_eq!(fs::read(&stored)?, fs::read(&agenda.path)?);
    Ok(())
}

#[test]
fn test_discard_deletes_output() -> TestResult {
    let workspace = Workspace::new();
    let agenda = workspace
        .pipeline()
        .generate_from_json(&sample_record().to_string())?;
    let path = agenda.path.clone();
    assert!(path.exists());

    agenda.discard()?;
    assert!(!path.exists());
    Ok(())
}
