//! Fixed HTML document shell and style sheet.

/// Everything before the first block: head, style rules, opening `<body>`.
pub(crate) const HEAD: &str = r#"<html>
<head>
    <meta charset="UTF-8">
    <style>
        body {
            font-family: 'Times New Roman', serif;
            line-height: 1.6;
            font-size: 14px;
            padding: 40px;
            color: #000;
        }
        h1 {
            color: #1a4d80;
            border-bottom: 2px solid #1a4d80;
            padding-bottom: 5px;
            font-size: 22px;
        }
        h2 {
            color: #1a4d80;
            margin-top: 30px;
            font-size: 18px;
        }
        h3 {
            margin-top: 20px;
            font-size: 16px;
            font-weight: bold;
        }
        p {
            margin-bottom: 12px;
            text-align: justify;
        }
        ul, ol {
            margin-left: 20px;
            margin-bottom: 15px;
        }
    </style>
</head>
<body>
"#;

/// Closes the body and document.
pub(crate) const TAIL: &str = "</body></html>";
