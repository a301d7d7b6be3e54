use html_escape::{encode_double_quoted_attribute, encode_text};

pub const SUCCESS_MESSAGE: &str = "Presença confirmada com sucesso!";

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Confirmação de presença</title>
    <style>
        body { font-family: sans-serif; max-width: 28rem; margin: 4rem auto; padding: 0 1rem; }
        input, button { font-size: 1rem; padding: 0.5rem; width: 100%; box-sizing: border-box; }
        button { margin-top: 0.75rem; }
        .sucesso { color: #1b5e20; }
        .erro { color: #b71c1c; }
    </style>
</head>
<body>
    <h1>Confirme sua presença</h1>
    {{feedback}}
    <form method="post" action="/">
        <label for="nome">Nome completo</label>
        <input id="nome" name="nome" type="text" value="{{nome}}" autocomplete="name" required>
        <button type="submit">Confirmar</button>
    </form>
</body>
</html>
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback<'a> {
    None,
    Success(&'a str),
    Error(&'a str),
}

/// Form page. `nome` prefills the input.
pub fn render(feedback: Feedback, nome: &str) -> String {
    let feedback = match feedback {
        Feedback::None => String::new(),
        Feedback::Success(message) => {
            format!(r#"<p class="sucesso">{}</p>"#, encode_text(message))
        }
        Feedback::Error(message) => format!(r#"<p class="erro">{}</p>"#, encode_text(message)),
    };

    TEMPLATE
        .replacen("{{feedback}}", &feedback, 1)
        .replacen("{{nome}}", &encode_double_quoted_attribute(nome), 1)
}
