pub mod marking;
pub mod omega;
pub mod petri_net;
