pub mod category_node;
pub mod category_panel;
pub mod graph_canvas;
pub mod product_picker;
