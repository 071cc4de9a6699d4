use std::path::Path;
use tera::Tera;
use tracing::info;

pub const LANDING_TEMPLATE: &str = "landing.html";
pub const SWAGGER_TEMPLATE: &str = "docs/swagger.html";
pub const REDOC_TEMPLATE: &str = "docs/redoc.html";

const BUILTIN_LANDING: &str = include_str!("../../../../app/templates/landing.html");

const BUILTIN_SWAGGER: &str = r##"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{{ title }} - Swagger UI</title>
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        SwaggerUIBundle({
            url: {{ openapi_url | json_encode() | safe }},
            dom_id: "#swagger-ui",
            deepLinking: true,
            presets: [SwaggerUIBundle.presets.apis, SwaggerUIBundle.SwaggerUIStandalonePreset],
        });
    </script>
</body>
</html>
"##;

const BUILTIN_REDOC: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{{ title }} - ReDoc</title>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>body { margin: 0; padding: 0; }</style>
</head>
<body>
    <redoc spec-url="{{ openapi_url }}"></redoc>
    <script src="https://cdn.jsdelivr.net/npm/redoc@2/bundles/redoc.standalone.js"></script>
</body>
</html>
"#;

/// Load templates from `dir`, filling in any built-in template it does not override
///
/// A missing directory is not an error; the built-ins are used alone.
pub fn load_templates(dir: &Path) -> Result<Tera, tera::Error> {
    let mut tera = if dir.is_dir() {
        let pattern = dir.join("**").join("*.html");
        Tera::new(&pattern.to_string_lossy())?
    } else {
        info!(path = %dir.display(), "template directory not found, using built-in templates");
        Tera::default()
    };

    let provided: Vec<String> = tera.get_template_names().map(str::to_owned).collect();
    for (name, source) in [
        (LANDING_TEMPLATE, BUILTIN_LANDING),
        (SWAGGER_TEMPLATE, BUILTIN_SWAGGER),
        (REDOC_TEMPLATE, BUILTIN_REDOC),
    ] {
        if !provided.iter().any(|p| p == name) {
            tera.add_raw_template(name, source)?;
        }
    }

    Ok(tera)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn builtins_fill_a_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let tera = load_templates(&dir.path().join("absent")).unwrap();

        let names: Vec<&str> = tera.get_template_names().collect();
        assert!(names.contains(&LANDING_TEMPLATE));
        assert!(names.contains(&SWAGGER_TEMPLATE));
        assert!(names.contains(&REDOC_TEMPLATE));
    }

    #[test]
    fn directory_templates_take_precedence() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("landing.html"), "custom {{ project_name }}").unwrap();

        let tera = load_templates(dir.path()).unwrap();
        let mut context = tera::Context::new();
        context.insert("project_name", "Applybot");

        assert_eq!(tera.render(LANDING_TEMPLATE, &context).unwrap(), "custom Applybot");
    }

    #[test]
    fn broken_templates_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("landing.html"), "{% if %}").unwrap();

        assert!(load_templates(dir.path()).is_err());
    }
}
