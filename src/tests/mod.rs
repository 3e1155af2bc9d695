
mod etcher_test;
mod render_test;
