use repository_template::version;

fn main() {
    println!("{}", version::print());
}
