use std::{path::Path, sync::Arc, time::Duration};

use docproc::processing::{
    DocumentId, DocumentRequest, PipelineSettings, ProcessingError, ProcessingService,
    ProcessingStatus, RunState,
};
use docx_rs::{Docx, Paragraph, Run};
use lopdf::{
    Document, Object, Stream,
    content::{Content, Operation},
    dictionary,
};
use rust_xlsxwriter::Workbook;

const CHECKPOINTS: [u8; 5] = [0, 25, 50, 75, 100];

fn service() -> Arc<ProcessingService> {
    Arc::new(ProcessingService::new(PipelineSettings::default()))
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn write_docx(path: &Path, paragraphs: &[&str]) {
    let docx = paragraphs.iter().fold(Docx::new(), |docx, text| {
        docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)))
    });
    let file = std::fs::File::create(path).expect("create docx");
    docx.build().pack(file).expect("pack docx");
}

/// One Courier text object per page.
fn write_pdf(path: &Path, pages: &[&str]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode page content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).expect("save pdf");
}

async fn wait_for_terminal(
    service: &ProcessingService,
    document_id: DocumentId,
) -> ProcessingStatus {
    loop {
        if let Ok(status) = service.get_status(document_id) {
            if status.status.is_terminal() {
                return status;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn plain_text_document_completes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("resumen.txt");
    std::fs::write(
        &path,
        "Los datos del estudio. Los datos muestran patrones.\nSegunda línea con datos.",
    )
    .expect("write fixture");

    let service = service();
    let result = service
        .submit_document(DocumentRequest::new(1, path_string(&path)))
        .await
        .expect("processed");

    assert_eq!(result.metadata.file_extension, ".txt");
    assert_eq!(result.metadata.line_count, 2);
    assert_eq!(result.text_length, result.metadata.character_count);
    assert_eq!(result.keywords[0], "datos");
    assert!(result.summary.chars().count() <= 200);

    let status = service.get_status(1).expect("status");
    assert_eq!(status.status, RunState::Completed);
    assert_eq!(status.progress, 100);
}

#[tokio::test]
async fn word_document_paragraphs_are_joined_by_newlines() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("capitulo.docx");
    write_docx(&path, &["Introducción al tema.", "Desarrollo del argumento."]);

    let service = service();
    let text = service
        .extract_text(&path_string(&path), None)
        .await
        .expect("docx text");
    assert_eq!(text, "Introducción al tema.\nDesarrollo del argumento.");

    let result = service
        .submit_document(DocumentRequest::new(2, path_string(&path)))
        .await
        .expect("processed");
    assert_eq!(result.metadata.file_extension, ".docx");
    assert_eq!(result.metadata.line_count, 2);
}

#[tokio::test]
async fn spreadsheet_rows_render_under_sheet_header() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tabla.xlsx");

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(0, 0, "a").expect("cell");
    worksheet.write_string(0, 1, "b").expect("cell");
    worksheet.write_string(2, 0, "c").expect("cell");
    worksheet.write_string(2, 1, "d").expect("cell");
    workbook.save(&path).expect("save workbook");

    let service = service();
    let text = service
        .extract_text(&path_string(&path), Some("xlsx"))
        .await
        .expect("spreadsheet text");
    assert_eq!(text, "Hoja: Sheet1\na | b\nc | d");
}

#[tokio::test]
async fn spreadsheet_pads_leading_empty_columns() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("desplazada.xlsx");

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(0, 1, "x").expect("cell");
    worksheet.write_string(0, 2, "y").expect("cell");
    workbook.save(&path).expect("save workbook");

    let text = service()
        .extract_text(&path_string(&path), None)
        .await
        .expect("spreadsheet text");
    assert_eq!(text, "Hoja: Sheet1\n | x | y");
}

#[tokio::test]
async fn every_sheet_gets_its_own_block() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("libro.xlsx");

    let mut workbook = Workbook::new();
    let notes = workbook.add_worksheet().set_name("Notas").expect("sheet name");
    notes.write_string(0, 0, "a").expect("cell");
    notes.write_string(0, 1, "b").expect("cell");
    let totals = workbook.add_worksheet().set_name("Resumen").expect("sheet name");
    totals.write_string(0, 0, "c").expect("cell");
    workbook.save(&path).expect("save workbook");

    let text = service()
        .extract_text(&path_string(&path), None)
        .await
        .expect("spreadsheet text");
    assert_eq!(text, "Hoja: Notas\na | b\n\nHoja: Resumen\nc");
}

#[tokio::test]
async fn pdf_pages_become_lines() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("articulo.pdf");
    write_pdf(&path, &["First page", "Second page"]);

    let service = service();
    let text = service
        .extract_text(&path_string(&path), Some("pdf"))
        .await
        .expect("pdf text");
    assert_eq!(text, "First page\nSecond page");

    let result = service
        .submit_document(DocumentRequest::new(6, path_string(&path)))
        .await
        .expect("processed");
    assert_eq!(result.metadata.file_extension, ".pdf");
    assert_eq!(result.metadata.line_count, 2);
}

#[tokio::test]
async fn missing_file_ends_in_error_status() {
    let service = service();
    let err = service
        .submit_document(DocumentRequest::new(3, "/nonexistent/tesis.pdf"))
        .await
        .expect_err("missing file");
    assert!(matches!(err, ProcessingError::NotFound { .. }));

    let status = service.get_status(3).expect("status");
    assert_eq!(status.status, RunState::Error);
    assert_eq!(status.progress, 0);
    assert!(status.message.contains("File not found"));
}

#[tokio::test]
async fn concurrent_pollers_observe_monotonic_checkpoints() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("largo.txt");
    let sentence = "Oración de prueba con contenido académico. ";
    let body: String = sentence.repeat(5000 / sentence.chars().count() + 1);
    std::fs::write(&path, &body).expect("write fixture");

    let service = service();
    let runner = {
        let service = Arc::clone(&service);
        let request = DocumentRequest::new(4, path_string(&path));
        tokio::spawn(async move { service.submit_document(request).await })
    };

    let mut observed = Vec::new();
    loop {
        if let Ok(status) = service.get_status(4) {
            observed.push(status.progress);
            if status.status.is_terminal() {
                break;
            }
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    let result = runner.await.expect("join").expect("processed");
    assert!(result.text_length >= 5000);
    assert!(result.extracted_text_preview.ends_with("..."));
    assert!(observed.windows(2).all(|pair| pair[0] <= pair[1]));
    assert!(observed.iter().all(|progress| CHECKPOINTS.contains(progress)));

    let status = service.get_status(4).expect("status");
    assert_eq!(status.status, RunState::Completed);
    assert_eq!(status.progress, 100);
    assert_eq!(observed.last(), Some(&100));
}

#[cfg(unix)]
#[tokio::test]
async fn run_finishes_after_caller_gives_up() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("canal.txt");
    let created = std::process::Command::new("mkfifo")
        .arg(&path)
        .status()
        .expect("run mkfifo");
    assert!(created.success());

    let service = service();
    let abandoned = tokio::time::timeout(
        Duration::from_millis(200),
        service.submit_document(DocumentRequest::new(5, path_string(&path))),
    )
    .await;
    assert!(abandoned.is_err(), "reader should still be blocked on the pipe");
    let status = service.get_status(5).expect("status");
    assert!(!status.status.is_terminal());

    let writer_path = path.clone();
    tokio::task::spawn_blocking(move || std::fs::write(writer_path, "Texto recibido tarde."))
        .await
        .expect("join writer")
        .expect("write pipe");

    let status = tokio::time::timeout(Duration::from_secs(5), wait_for_terminal(&service, 5))
        .await
        .expect("run reaches a terminal state");
    assert_eq!(status.status, RunState::Completed);
    assert_eq!(status.progress, 100);
    assert_eq!(
        status.result.map(|result| result.text_length),
        Some("Texto recibido tarde.".chars().count())
    );
}
