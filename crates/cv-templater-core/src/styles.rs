//! Print stylesheet for HTML output and HTML-based PDF engines.

pub const PRINT_STYLESHEET: &str = r#"@page {
    size: A4;
    margin: 0.4cm;
    @bottom-center {
        content: "Page " counter(page);
        font-size: 9pt;
    }
}

body {
    font-size: 10pt;
    margin: 0;
    padding: 0;
}

h1 {
    font-size: 20pt;
    margin-bottom: 3px;
}

h2 {
    font-size: 11pt;
    padding: 6px 12px;
    margin: 8px 0 0;
    page-break-after: avoid;
    break-after: avoid;
}

h3 {
    font-size: 10pt;
    margin-bottom: 4px;
    page-break-after: avoid;
    break-after: avoid;
}

ul {
    page-break-inside: avoid;
    break-inside: avoid;
}

.cv-header {
    padding: 20px;
}

.cv-header .position {
    font-size: 12pt;
    margin-bottom: 6px;
}

.cv-header .contact {
    font-size: 9pt;
}

.cv-section-content {
    font-size: 10pt;
    padding: 8px 12px;
    page-break-inside: avoid;
    break-inside: avoid;
}

.cv-multi-item {
    padding: 6px 10px;
    margin-bottom: 4px;
    page-break-inside: avoid;
    break-inside: avoid;
}

#work-experience .cv-multi-item:nth-child(2) {
    page-break-before: always;
    break-before: page;
}

.tech-tag {
    font-size: 8pt;
    padding: 1px 4px;
    margin: 1px;
}
"#;
