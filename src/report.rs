use geotrace::GeotraceError;

pub fn report_error(err: &GeotraceError) {
    match err {
        GeotraceError::Image(inner) => {
            eprintln!("Could not process scan image: {inner}");
            eprintln!();
            eprintln!("The input must be a mask image the `image` crate can decode (PNG is expected).");
        }
        GeotraceError::Json(inner) => {
            eprintln!("Invalid options file: {inner}");
            eprintln!(
                "Check the file passed with --config or the {} environment variable.",
                geotrace::ENV_CONFIG_PATH
            );
        }
        _ => {
            eprintln!("{err}");
        }
    }
}
