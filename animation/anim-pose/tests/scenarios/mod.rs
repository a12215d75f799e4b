mod locomotion;
