fn main() {
    let input = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "M10,10 h40 a10,10 0 0,1 10,10 v30 Q60,60 40,60 z".to_string());

    match vmldraw::vml_path(&input) {
        Ok(vml) => println!("{}", vml),
        Err(e) => eprintln!("Error: {:?}", e),
    }
}
