use miette::Result;
use rebind_core::version::version_string;
use rebind_core::VERSION;
use serde::Serialize;

#[derive(Serialize)]
struct VersionJson {
    name: &'static str,
    version: &'static str,
}

pub fn run(json: bool) -> Result<()> {
    if json {
        super::print_json(&VersionJson {
            name: "rebind",
            version: VERSION,
        })
    } else {
        println!("{}", version_string());
        Ok(())
    }
}
